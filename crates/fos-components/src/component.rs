//! Component Base
//!
//! A [`Component`] pairs an element's state with the per-instance
//! bookkeeping shared by every element: the rendering root, adopted style
//! sheets, the property bag and the diagnostics sink.
//!
//! The rendering root is chosen once at construction. Isolated components
//! render into a shadow root attached to their host; the rest render into
//! the host element itself.

use std::rc::Rc;

use fos_css::CssStyleSheet;
use fos_dom::{DomTree, NodeId, Selector, to_camel_case};

use crate::bindings::PropertyBag;
use crate::config::{ElementConfig, Styles};
use crate::diagnostics::Diagnostics;
use crate::element::{Context, CustomElement, ElementClass};
use crate::references;
use crate::template::{Template, TemplateCompiler};
use crate::ComponentError;

/// Per-instance state shared by every component
pub struct ComponentCore {
    tag: String,
    host: NodeId,
    root: NodeId,
    isolated: bool,
    initialized: bool,
    connected: bool,
    properties: PropertyBag,
    adopted: Vec<CssStyleSheet>,
    compiler: TemplateCompiler,
    diagnostics: Rc<dyn Diagnostics>,
}

impl ComponentCore {
    /// Pick the rendering root for `host` and adopt the static styles.
    ///
    /// Styles are compiled before the shadow root is attached, so a style
    /// error leaves the host untouched.
    pub fn new(
        tree: &mut DomTree,
        host: NodeId,
        tag: &str,
        config: &ElementConfig,
        diagnostics: Rc<dyn Diagnostics>,
    ) -> Result<Self, ComponentError> {
        let (root, adopted) = if config.shadow {
            let sheets = compile_sheets(&config.styles)?;
            (tree.attach_shadow(host, config.shadow_mode)?, sheets)
        } else {
            if !config.styles.is_empty() {
                diagnostics.debug(tag, "styles are ignored without a shadow root");
            }
            (host, Vec::new())
        };

        tracing::debug!(element = tag, ?host, ?root, isolated = config.shadow, "constructed component");
        Ok(Self {
            tag: tag.to_string(),
            host,
            root,
            isolated: config.shadow,
            initialized: false,
            connected: false,
            properties: PropertyBag::new(),
            adopted,
            compiler: TemplateCompiler::new(config.escape),
            diagnostics,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Node all scoped queries start from
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    pub fn compiler(&self) -> TemplateCompiler {
        self.compiler
    }

    pub fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    /// Style sheets adopted by the shadow root, in adoption order
    pub fn adopted_style_sheets(&self) -> &[CssStyleSheet] {
        &self.adopted
    }

    /// Compile and append style sheets to the shadow root's adopted list
    pub fn decorate(&mut self, styles: impl Into<Styles>) -> Result<(), ComponentError> {
        if !self.isolated {
            return Err(ComponentError::NotIsolated { tag: self.tag.clone() });
        }
        let sheets = compile_sheets(&styles.into())?;
        self.diagnostics.debug(&self.tag, &format!("adopted {} style sheet(s)", sheets.len()));
        self.adopted.extend(sheets);
        Ok(())
    }

    pub fn select(&self, tree: &DomTree, query: &str) -> Option<NodeId> {
        self.select_in(tree, query, self.root)
    }

    /// First element under `scope` matching `query`
    pub fn select_in(&self, tree: &DomTree, query: &str, scope: NodeId) -> Option<NodeId> {
        let selector = self.selector(query)?;
        tree.query_selector(scope, &selector)
    }

    pub fn select_all(&self, tree: &DomTree, query: &str) -> Vec<NodeId> {
        self.select_all_in(tree, query, self.root)
    }

    /// Every element under `scope` matching `query`, in tree order
    pub fn select_all_in(&self, tree: &DomTree, query: &str, scope: NodeId) -> Vec<NodeId> {
        match self.selector(query) {
            Some(selector) => tree.query_selector_all(scope, &selector),
            None => Vec::new(),
        }
    }

    fn selector(&self, query: &str) -> Option<Selector> {
        match Selector::parse(query) {
            Ok(selector) => Some(selector),
            Err(err) => {
                self.diagnostics.warn(&self.tag, &format!("invalid selector `{query}`: {err}"));
                None
            }
        }
    }

    /// Append the children of `fragment` to the root
    pub fn set_template(&self, tree: &mut DomTree, fragment: &DomTree) -> Result<(), ComponentError> {
        tree.append_fragment(self.root, fragment, fragment.root())?;
        Ok(())
    }

    /// Warning panel naming this element, reported to diagnostics
    pub fn fallback(&self) -> DomTree {
        self.diagnostics.warn(&self.tag, "render() is not implemented, showing fallback content");
        let template = Template::new()
            .text(concat!(
                r#"<div part="fallback" style="padding: 1em; border: 2px dashed #e0a800; "#,
                r#"background: #fff8e1; color: #5c4400; font-family: sans-serif;">"#,
                "<strong>&lt;",
            ))
            .value(&self.tag)
            .text("&gt;</strong> does not implement render().</div>");
        self.compiler.compile(&template)
    }
}

fn compile_sheets(styles: &Styles) -> Result<Vec<CssStyleSheet>, ComponentError> {
    styles.texts()
        .into_iter()
        .map(|text| CssStyleSheet::parse(text).map_err(ComponentError::from))
        .collect()
}

/// A custom element instance
pub struct Component<T: CustomElement> {
    class: Rc<ElementClass<T>>,
    state: T,
    core: ComponentCore,
}

impl<T: CustomElement> Component<T> {
    /// Construct a component for `host`
    pub fn new(
        tree: &mut DomTree,
        host: NodeId,
        class: Rc<ElementClass<T>>,
        state: T,
        diagnostics: Rc<dyn Diagnostics>,
    ) -> Result<Self, ComponentError> {
        let core = ComponentCore::new(tree, host, class.name(), class.config(), diagnostics)?;
        Ok(Self { class, state, core })
    }

    pub fn class(&self) -> &ElementClass<T> {
        &self.class
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    /// Mutable state. Markers are not refreshed until the next
    /// [`update_references`](Self::update_references).
    pub fn state_mut(&mut self) -> &mut T {
        &mut self.state
    }

    pub fn core(&self) -> &ComponentCore {
        &self.core
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

    pub fn is_initialized(&self) -> bool {
        self.core.is_initialized()
    }

    pub fn is_connected(&self) -> bool {
        self.core.is_connected()
    }

    pub fn properties(&self) -> &PropertyBag {
        self.core.properties()
    }

    /// Resolve a property: typed getter first, then the property bag
    pub fn property(&self, name: &str) -> Option<String> {
        resolve(&self.class, &self.state, &self.core.properties, name)
    }

    pub fn decorate(&mut self, styles: impl Into<Styles>) -> Result<(), ComponentError> {
        self.core.decorate(styles)
    }

    pub fn adopted_style_sheets(&self) -> &[CssStyleSheet] {
        self.core.adopted_style_sheets()
    }

    pub fn select(&self, tree: &DomTree, query: &str) -> Option<NodeId> {
        self.core.select(tree, query)
    }

    pub fn select_in(&self, tree: &DomTree, query: &str, scope: NodeId) -> Option<NodeId> {
        self.core.select_in(tree, query, scope)
    }

    pub fn select_all(&self, tree: &DomTree, query: &str) -> Vec<NodeId> {
        self.core.select_all(tree, query)
    }

    pub fn select_all_in(&self, tree: &DomTree, query: &str, scope: NodeId) -> Vec<NodeId> {
        self.core.select_all_in(tree, query, scope)
    }

    pub fn set_template(&self, tree: &mut DomTree, fragment: &DomTree) -> Result<(), ComponentError> {
        self.core.set_template(tree, fragment)
    }

    /// First connection: init, render, full Reference Pass, connected hook.
    ///
    /// Later calls do nothing. If init or rendering fails the component stays
    /// uninitialized and the next call starts over.
    pub fn connected_callback(&mut self, tree: &mut DomTree) -> Result<(), ComponentError> {
        if self.core.initialized {
            tracing::trace!(element = %self.core.tag, "already connected");
            return Ok(());
        }

        self.core.initialized = true;
        if let Err(err) = self.render_root(tree) {
            self.core.initialized = false;
            tracing::debug!(element = %self.core.tag, %err, "initialization failed");
            return Err(err);
        }
        self.core.connected = true;
        tracing::debug!(element = %self.core.tag, "connected");

        let Self { state, core, .. } = self;
        state.connected(&mut Context::new(core, tree))
    }

    /// Reflect an observed attribute change onto the component.
    ///
    /// The typed setter for `name` wins; without one the value is stored in
    /// the property bag under the camelCase name. Once connected, markers
    /// bound to that name are refreshed.
    pub fn attribute_changed_callback(
        &mut self,
        tree: &mut DomTree,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        if old == new || !self.class.bindings().is_observed(name) {
            return Ok(());
        }

        let property = to_camel_case(name);
        if !self.class.bindings().set(&mut self.state, name, new) {
            match new {
                Some(value) => self.core.properties.set(&property, value),
                None => {
                    self.core.properties.remove(&property);
                }
            }
        }

        {
            let Self { state, core, .. } = self;
            state.attribute_changed(&mut Context::new(core, tree), name, old, new)?;
        }

        if self.core.connected {
            self.update_references(tree, Some(&property))?;
        }
        Ok(())
    }

    fn render_root(&mut self, tree: &mut DomTree) -> Result<(), ComponentError> {
        {
            let Self { state, core, .. } = self;
            let mut cx = Context::new(core, tree);
            state.init(&mut cx)?;
            let fragment = state.render(&mut cx);
            core.set_template(tree, &fragment)?;
        }
        self.update_references(tree, None)?;
        Ok(())
    }

    /// Run the Reference Pass over the root
    pub fn update_references(&self, tree: &mut DomTree, changed_key: Option<&str>) -> Result<usize, ComponentError> {
        let written = references::update_references(tree, self.core.root, changed_key, |name| {
            resolve(&self.class, &self.state, &self.core.properties, name)
        })?;
        Ok(written)
    }
}

fn resolve<T>(class: &ElementClass<T>, state: &T, properties: &PropertyBag, name: &str) -> Option<String> {
    class.bindings()
        .get(state, name)
        .or_else(|| properties.get(name).map(str::to_string))
}
