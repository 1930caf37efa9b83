//! fOS Components
//!
//! Base layer for custom elements: optional shadow root isolation, style
//! adoption, attribute-to-property reflection and a small template compiler
//! whose reference markers are refreshed after every render and attribute
//! change.

mod bindings;
mod component;
mod config;
mod diagnostics;
mod element;
mod references;
mod registry;
mod template;

pub use bindings::{Bindings, PropertyBag};
pub use component::{Component, ComponentCore};
pub use config::{ElementConfig, Styles};
pub use diagnostics::{Diagnostics, Level, Record, RecordingDiagnostics, SilentDiagnostics, TracingDiagnostics};
pub use element::{Context, CustomElement, ElementClass};
pub use references::{REF_ATTR, REF_PREFIX, VALUE_ATTR, update_references};
pub use registry::{CustomElementRegistry, ElementHandle, Page};
pub use template::{Binding, BindingKind, EscapePolicy, Segment, Template, TemplateCompiler, html, tokenize};

use fos_css::CssError;
use fos_dom::DomError;

/// Component errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Style(#[from] CssError),

    /// Style adoption needs a shadow root
    #[error("<{tag}> renders without a shadow root and cannot adopt style sheets")]
    NotIsolated { tag: String },
}

/// Custom element registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("'{0}' is not a valid custom element name")]
    InvalidName(String),

    #[error("'{0}' has already been defined")]
    AlreadyDefined(String),

    #[error("'{0}' is not defined")]
    NotDefined(String),

    #[error(transparent)]
    Component(#[from] ComponentError),
}
