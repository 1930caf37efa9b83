//! Binding table
//!
//! Per-class table of observed attributes, typed setters keyed by
//! attribute name and typed getters keyed by property name. Reflection and
//! the Reference Pass look names up here.

use std::collections::HashMap;
use std::fmt;

type Setter<T> = Box<dyn Fn(&mut T, Option<&str>)>;
type Getter<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Observed attributes and property accessors for one element class
pub struct Bindings<T> {
    observed: Vec<String>,
    setters: HashMap<String, Setter<T>>,
    getters: HashMap<String, Getter<T>>,
}

impl<T> Bindings<T> {
    pub fn new() -> Self {
        Self {
            observed: Vec::new(),
            setters: HashMap::new(),
            getters: HashMap::new(),
        }
    }

    /// Observe an attribute. Without a setter its value lands in the
    /// property bag.
    pub fn observe(mut self, attribute: &str) -> Self {
        if !self.is_observed(attribute) {
            self.observed.push(attribute.to_string());
        }
        self
    }

    /// Register a setter for `attribute`; `None` means the attribute was removed
    pub fn setter<F>(mut self, attribute: &str, f: F) -> Self
    where
        F: Fn(&mut T, Option<&str>) + 'static,
    {
        self.setters.insert(attribute.to_string(), Box::new(f));
        self
    }

    /// Observe an attribute and register its setter
    pub fn observe_with<F>(self, attribute: &str, f: F) -> Self
    where
        F: Fn(&mut T, Option<&str>) + 'static,
    {
        self.observe(attribute).setter(attribute, f)
    }

    /// Expose a property to reference markers
    pub fn property<V, F>(mut self, name: &str, f: F) -> Self
    where
        V: ToString,
        F: Fn(&T) -> Option<V> + 'static,
    {
        self.getters.insert(
            name.to_string(),
            Box::new(move |state| f(state).map(|v| v.to_string())),
        );
        self
    }

    /// Observed attribute names, in registration order
    pub fn observed(&self) -> &[String] {
        &self.observed
    }

    pub fn is_observed(&self, attribute: &str) -> bool {
        self.observed.iter().any(|a| a == attribute)
    }

    /// Run the setter for `attribute`. Returns false when none is registered.
    pub fn set(&self, state: &mut T, attribute: &str, value: Option<&str>) -> bool {
        match self.setters.get(attribute) {
            Some(setter) => {
                setter(state, value);
                true
            }
            None => false,
        }
    }

    /// Read a property through its getter
    pub fn get(&self, state: &T, property: &str) -> Option<String> {
        self.getters.get(property).and_then(|getter| getter(state))
    }
}

impl<T> Default for Bindings<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Bindings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut setters: Vec<_> = self.setters.keys().collect();
        setters.sort();
        let mut getters: Vec<_> = self.getters.keys().collect();
        getters.sort();
        f.debug_struct("Bindings")
            .field("observed", &self.observed)
            .field("setters", &setters)
            .field("getters", &getters)
            .finish()
    }
}

/// Untyped property values written by reflection, keyed by camelCase name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    values: HashMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
