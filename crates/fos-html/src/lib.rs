//! fOS HTML
//!
//! `<template>` parsing built on html5ever, plus escaping and
//! serialization of fOS DOM trees.

mod parser;
mod serializer;

pub use parser::{HtmlParser, TemplateElement};
pub use serializer::{HtmlSerializer, escape_attribute, escape_html, escape_text};

use fos_dom::DomTree;

/// Parse markup into a detached document fragment
pub fn parse_fragment(markup: &str) -> DomTree {
    HtmlParser::new().parse_template(markup).into_content()
}

/// Serialize the children of the tree's root
pub fn inner_html(tree: &DomTree) -> String {
    HtmlSerializer::new().serialize_inner(tree, tree.root())
}
