//! Custom element registry and host page
//!
//! The registry maps element names to constructors. [`Page`] plays the part
//! of the host runtime: it owns a document, constructs components for
//! defined names and dispatches their lifecycle callbacks as the tree is
//! mutated.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use fos_dom::{Document, DomTree, NodeId};

use crate::component::Component;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::element::{CustomElement, ElementClass};
use crate::{ComponentError, CustomElementError};

/// Names the HTML and SVG specs reserve despite containing a hyphen
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Validate a custom element name
pub fn is_valid_name(name: &str) -> bool {
    name.contains('-')
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && !RESERVED_NAMES.contains(&name)
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
}

/// Type-erased component, as stored by the page
pub trait ElementHandle {
    fn tag(&self) -> &str;

    fn observed_attributes(&self) -> &[String];

    fn is_connected(&self) -> bool;

    fn connected_callback(&mut self, tree: &mut DomTree) -> Result<(), ComponentError>;

    fn attribute_changed_callback(
        &mut self,
        tree: &mut DomTree,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError>;

    fn update_references(&self, tree: &mut DomTree, changed_key: Option<&str>) -> Result<usize, ComponentError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: CustomElement> ElementHandle for Component<T> {
    fn tag(&self) -> &str {
        Component::tag(self)
    }

    fn observed_attributes(&self) -> &[String] {
        self.class().bindings().observed()
    }

    fn is_connected(&self) -> bool {
        Component::is_connected(self)
    }

    fn connected_callback(&mut self, tree: &mut DomTree) -> Result<(), ComponentError> {
        Component::connected_callback(self, tree)
    }

    fn attribute_changed_callback(
        &mut self,
        tree: &mut DomTree,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        Component::attribute_changed_callback(self, tree, name, old, new)
    }

    fn update_references(&self, tree: &mut DomTree, changed_key: Option<&str>) -> Result<usize, ComponentError> {
        Component::update_references(self, tree, changed_key)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Constructor =
    Box<dyn Fn(&mut DomTree, NodeId, Rc<dyn Diagnostics>) -> Result<Box<dyn ElementHandle>, ComponentError>>;

/// Custom element registry
#[derive(Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, Constructor>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` with state built by `T::default()`
    pub fn define<T: CustomElement + Default>(&mut self, name: &str) -> Result<(), CustomElementError> {
        self.define_with(name, T::default)
    }

    /// Define `name` with state built by `ctor`
    pub fn define_with<T, F>(&mut self, name: &str, ctor: F) -> Result<(), CustomElementError>
    where
        T: CustomElement,
        F: Fn() -> T + 'static,
    {
        if !is_valid_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }
        if self.definitions.contains_key(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        let class = Rc::new(ElementClass::<T>::new(name));
        tracing::debug!(name, observed = ?class.bindings().observed(), "defined custom element");
        self.definitions.insert(
            name.to_string(),
            Box::new(move |tree, host, diagnostics| {
                let component = Component::new(tree, host, Rc::clone(&class), ctor(), diagnostics)?;
                Ok(Box::new(component) as Box<dyn ElementHandle>)
            }),
        );
        Ok(())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Defined names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct the component for `host`, if `name` is defined
    pub fn construct(
        &self,
        name: &str,
        tree: &mut DomTree,
        host: NodeId,
        diagnostics: Rc<dyn Diagnostics>,
    ) -> Option<Result<Box<dyn ElementHandle>, ComponentError>> {
        self.definitions.get(name).map(|ctor| ctor(tree, host, diagnostics))
    }
}

/// Document plus the components living in it
pub struct Page {
    document: Document,
    registry: CustomElementRegistry,
    components: HashMap<NodeId, Box<dyn ElementHandle>>,
    diagnostics: Rc<dyn Diagnostics>,
}

impl Page {
    pub fn new(registry: CustomElementRegistry) -> Self {
        Self::with_diagnostics(registry, Rc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(registry: CustomElementRegistry, diagnostics: Rc<dyn Diagnostics>) -> Self {
        Self {
            document: Document::default(),
            registry,
            components: HashMap::new(),
            diagnostics,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &DomTree {
        &self.document.tree
    }

    pub fn body(&self) -> NodeId {
        self.document.body()
    }

    pub fn registry(&self) -> &CustomElementRegistry {
        &self.registry
    }

    /// Create a detached element, constructing its component when defined
    pub fn create_element(&mut self, name: &str) -> Result<NodeId, ComponentError> {
        let name = name.to_ascii_lowercase();
        let tree = &mut self.document.tree;
        let id = tree.create_element(&name);
        if let Some(component) = self.registry.construct(&name, tree, id, Rc::clone(&self.diagnostics)) {
            self.components.insert(id, component?);
        }
        Ok(id)
    }

    /// Set an attribute, reflecting it into the element's component
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), ComponentError> {
        let old = self.document.tree.set_attribute(id, name, value)?;
        self.attribute_changed(id, name, old.as_deref(), Some(value))
    }

    /// Remove an attribute, reflecting the removal into the element's component
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), ComponentError> {
        let old = self.document.tree.remove_attribute(id, name)?;
        self.attribute_changed(id, name, old.as_deref(), None)
    }

    fn attribute_changed(
        &mut self,
        id: NodeId,
        name: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), ComponentError> {
        let Some(component) = self.components.get_mut(&id) else {
            return Ok(());
        };
        if !component.observed_attributes().iter().any(|a| a == name) {
            return Ok(());
        }
        component.attribute_changed_callback(&mut self.document.tree, name, old, new)
    }

    /// Append `child` to `parent`, then connect every component that became
    /// connected, in tree order
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ComponentError> {
        self.document.tree.append_child(parent, child)?;
        if !self.document.tree.is_connected(child) {
            return Ok(());
        }

        let mut pending = vec![child];
        pending.extend(self.document.tree.descendants(child));
        for id in pending {
            if self.needs_connect(id) {
                self.connect(id)?;
            }
        }
        Ok(())
    }

    /// True for a host whose component is unconnected or not yet constructed
    fn needs_connect(&self, id: NodeId) -> bool {
        match self.components.get(&id) {
            Some(component) => !component.is_connected(),
            None => self.document.tree.tag_name(id).is_some_and(|name| self.registry.is_defined(name)),
        }
    }

    fn connect(&mut self, id: NodeId) -> Result<(), ComponentError> {
        if !self.components.contains_key(&id) {
            self.upgrade(id)?;
        }
        let Some(component) = self.components.get_mut(&id) else {
            return Ok(());
        };
        if component.is_connected() {
            return Ok(());
        }
        component.connected_callback(&mut self.document.tree)?;

        // Rendering may have produced nested hosts
        let scope = self.document.tree.shadow_root(id).unwrap_or(id);
        let nested: Vec<NodeId> = self.document.tree.descendants(scope)
            .filter(|&nested_id| self.needs_connect(nested_id))
            .collect();
        for nested_id in nested {
            // an earlier sibling may have connected it already
            if self.needs_connect(nested_id) {
                self.connect(nested_id)?;
            }
        }
        Ok(())
    }

    /// Construct the component of an element that was not created through
    /// [`create_element`](Self::create_element), e.g. one parsed from a template.
    /// Observed attributes it already carries are reflected.
    fn upgrade(&mut self, id: NodeId) -> Result<(), ComponentError> {
        let Some(name) = self.document.tree.tag_name(id).map(str::to_string) else {
            return Ok(());
        };
        let tree = &mut self.document.tree;
        let Some(component) = self.registry.construct(&name, tree, id, Rc::clone(&self.diagnostics)) else {
            return Ok(());
        };
        let mut component = component?;
        tracing::debug!(element = %name, ?id, "upgraded element");

        let attrs: Vec<(String, String)> = tree.element(id)
            .map(|e| e.attrs.iter().map(|a| (a.name.clone(), a.value.clone())).collect())
            .unwrap_or_default();
        for (attr, value) in attrs {
            if component.observed_attributes().contains(&attr) {
                component.attribute_changed_callback(tree, &attr, None, Some(&value))?;
            }
        }
        self.components.insert(id, component);
        Ok(())
    }

    /// Typed access to the component of `id`
    pub fn component<T: CustomElement>(&self, id: NodeId) -> Option<&Component<T>> {
        self.components.get(&id)?.as_any().downcast_ref()
    }

    pub fn component_mut<T: CustomElement>(&mut self, id: NodeId) -> Option<&mut Component<T>> {
        self.components.get_mut(&id)?.as_any_mut().downcast_mut()
    }

    /// Run `f` with the component of `id` and the page's tree
    pub fn with_component<T, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Component<T>, &mut DomTree) -> R,
    ) -> Option<R>
    where
        T: CustomElement,
    {
        let component = self.components.get_mut(&id)?.as_any_mut().downcast_mut::<Component<T>>()?;
        Some(f(component, &mut self.document.tree))
    }

    /// Re-run the full Reference Pass of one component
    pub fn update_references(&mut self, id: NodeId) -> Result<usize, ComponentError> {
        match self.components.get(&id) {
            Some(component) => component.update_references(&mut self.document.tree, None),
            None => Ok(0),
        }
    }
}
