//! Template parser
//!
//! Uses html5ever's RcDom and converts the content of a `<template>`
//! element into an fOS fragment tree.

use fos_dom::{DomResult, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse markup as the content of a `<template>` element.
    ///
    /// Parsing never fails: malformed markup is repaired the way a browser
    /// would repair it.
    pub fn parse_template(&self, markup: &str) -> TemplateElement {
        tracing::debug!(bytes = markup.len(), "parsing template markup");

        let dom = parse_document(RcDom::default(), Default::default())
            .one(format!("<template>{markup}</template>"));

        let mut content = DomTree::fragment();
        if let Some(contents) = find_template_contents(&dom.document) {
            let root = content.root();
            if let Err(err) = self.convert_children(&contents, &mut content, root) {
                tracing::warn!(%err, "template conversion stopped early");
            }
        }

        tracing::debug!(nodes = content.len(), "parsed template");
        TemplateElement { content }
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, parent)?;
        }
        Ok(())
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
        match &handle.data {
            RcNodeData::Document => self.convert_children(handle, tree, parent),
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id)
            }
            RcNodeData::Text { contents } => {
                let id = tree.create_text(&contents.borrow());
                tree.append_child(parent, id)
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &*attr.value);
                    }
                }
                tree.append_child(parent, id)?;

                // Nested template content stays inert and is not copied
                self.convert_children(handle, tree, id)
            }
            RcNodeData::ProcessingInstruction { .. } => Ok(()),
        }
    }
}

/// Depth-first search for the first `<template>` and its content
fn find_template_contents(handle: &Handle) -> Option<Handle> {
    if let RcNodeData::Element { name, template_contents, .. } = &handle.data {
        if &*name.local == "template" {
            return template_contents.borrow().clone();
        }
    }
    handle.children.borrow().iter().find_map(find_template_contents)
}

/// HTMLTemplateElement - inert content that is cloned on use
#[derive(Debug, Clone)]
pub struct TemplateElement {
    content: DomTree,
}

impl TemplateElement {
    /// Parse markup into a template element
    pub fn parse(markup: &str) -> Self {
        HtmlParser::new().parse_template(markup)
    }

    /// The template's content fragment
    pub fn content(&self) -> &DomTree {
        &self.content
    }

    /// An independent copy of the content, safe to insert anywhere
    pub fn clone_content(&self) -> DomTree {
        self.content.clone()
    }

    /// Take the content, consuming the template
    pub fn into_content(self) -> DomTree {
        self.content
    }
}
