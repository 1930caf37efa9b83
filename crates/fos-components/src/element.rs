//! Custom element classes and hook context

use std::fmt;

use fos_dom::{DomTree, NodeId};

use crate::bindings::{Bindings, PropertyBag};
use crate::component::ComponentCore;
use crate::config::{ElementConfig, Styles};
use crate::diagnostics::Diagnostics;
use crate::template::Template;
use crate::ComponentError;

/// Behavior of a custom element class.
///
/// Implemented by the element's state type. Every method has a default, so
/// an empty impl yields a working (if unhelpful) element.
pub trait CustomElement: Sized + 'static {
    /// Static configuration, read once per class
    fn config() -> ElementConfig {
        ElementConfig::default()
    }

    /// Observed attributes and property accessors, built once per class
    fn bindings() -> Bindings<Self> {
        Bindings::new()
    }

    /// Runs on first connection, before render
    fn init(&mut self, _cx: &mut Context<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Build the content appended into the root on connection
    fn render(&self, cx: &mut Context<'_>) -> DomTree {
        cx.fallback()
    }

    /// Runs after the first render and Reference Pass
    fn connected(&mut self, _cx: &mut Context<'_>) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Runs after an observed attribute has been reflected
    fn attribute_changed(
        &mut self,
        _cx: &mut Context<'_>,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// A defined element: name, configuration and binding table
pub struct ElementClass<T> {
    name: String,
    config: ElementConfig,
    bindings: Bindings<T>,
}

impl<T: CustomElement> ElementClass<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: T::config(),
            bindings: T::bindings(),
        }
    }
}

impl<T> ElementClass<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ElementConfig {
        &self.config
    }

    pub fn bindings(&self) -> &Bindings<T> {
        &self.bindings
    }
}

impl<T> fmt::Debug for ElementClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementClass")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// What a hook can reach: the tree and the component's shared state
pub struct Context<'a> {
    core: &'a mut ComponentCore,
    tree: &'a mut DomTree,
}

impl<'a> Context<'a> {
    pub(crate) fn new(core: &'a mut ComponentCore, tree: &'a mut DomTree) -> Self {
        Self { core, tree }
    }

    pub fn tag(&self) -> &str {
        self.core.tag()
    }

    pub fn host(&self) -> NodeId {
        self.core.host()
    }

    pub fn root(&self) -> NodeId {
        self.core.root()
    }

    pub fn is_isolated(&self) -> bool {
        self.core.is_isolated()
    }

    pub fn is_initialized(&self) -> bool {
        self.core.is_initialized()
    }

    pub fn is_connected(&self) -> bool {
        self.core.is_connected()
    }

    pub fn tree(&self) -> &DomTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut *self.tree
    }

    /// Compile a template with the class's escaping policy
    pub fn html(&self, template: &Template) -> DomTree {
        self.core.compiler().compile(template)
    }

    /// Warning panel used when render is not implemented
    pub fn fallback(&self) -> DomTree {
        self.core.fallback()
    }

    pub fn select(&self, query: &str) -> Option<NodeId> {
        self.core.select(&*self.tree, query)
    }

    pub fn select_in(&self, query: &str, scope: NodeId) -> Option<NodeId> {
        self.core.select_in(&*self.tree, query, scope)
    }

    pub fn select_all(&self, query: &str) -> Vec<NodeId> {
        self.core.select_all(&*self.tree, query)
    }

    pub fn select_all_in(&self, query: &str, scope: NodeId) -> Vec<NodeId> {
        self.core.select_all_in(&*self.tree, query, scope)
    }

    pub fn decorate(&mut self, styles: impl Into<Styles>) -> Result<(), ComponentError> {
        self.core.decorate(styles)
    }

    pub fn properties(&self) -> &PropertyBag {
        self.core.properties()
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        self.core.properties_mut()
    }

    pub fn diagnostics(&self) -> &dyn Diagnostics {
        self.core.diagnostics()
    }
}
