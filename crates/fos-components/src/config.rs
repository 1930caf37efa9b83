//! Static element class configuration

use fos_dom::ShadowRootMode;

use crate::template::EscapePolicy;

/// Style text for a component: none, one sheet, or an ordered list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Styles {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Styles {
    /// Style texts in adoption order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Styles::None => Vec::new(),
            Styles::One(text) => vec![text.as_str()],
            Styles::Many(texts) => texts.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Styles::None => true,
            Styles::One(_) => false,
            Styles::Many(texts) => texts.is_empty(),
        }
    }
}

impl From<&str> for Styles {
    fn from(text: &str) -> Self {
        Styles::One(text.to_string())
    }
}

impl From<String> for Styles {
    fn from(text: String) -> Self {
        Styles::One(text)
    }
}

impl From<Vec<String>> for Styles {
    fn from(texts: Vec<String>) -> Self {
        Styles::Many(texts)
    }
}

impl From<Vec<&str>> for Styles {
    fn from(texts: Vec<&str>) -> Self {
        Styles::Many(texts.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Styles {
    fn from(texts: [&str; N]) -> Self {
        Styles::Many(texts.into_iter().map(str::to_string).collect())
    }
}

/// Per-class settings read once at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementConfig {
    /// Render into a shadow root instead of the host element
    pub shadow: bool,
    /// Sheets adopted by the shadow root at construction
    pub styles: Styles,
    pub shadow_mode: ShadowRootMode,
    /// How template values are interpolated
    pub escape: EscapePolicy,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            shadow: true,
            styles: Styles::None,
            shadow_mode: ShadowRootMode::Open,
            escape: EscapePolicy::Escape,
        }
    }
}

impl ElementConfig {
    /// Render directly into the host element
    pub fn light() -> Self {
        Self { shadow: false, ..Self::default() }
    }

    pub fn with_styles(mut self, styles: impl Into<Styles>) -> Self {
        self.styles = styles.into();
        self
    }

    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.escape = escape;
        self
    }
}
