//! Template compiler
//!
//! A [`Template`] is the literal-template shape: static strings interleaved
//! with interpolated values. Compiling it concatenates both, tokenizes the
//! result for `({key})` placeholders and parses the rewritten markup into a
//! detached fragment.
//!
//! Placeholder forms:
//! - `({key})` in content becomes `<span data-ref="key">…</span>`
//! - `name="({key})"` becomes `name="" data-ref-name="key" data-ref=""`
//!
//! Keys match `[A-Za-z0-9_]+`, attribute names `[A-Za-z0-9_-]+`. Anything
//! else is left as literal text.

use std::fmt::Display;
use std::ops::Range;

use fos_dom::DomTree;
use fos_html::{TemplateElement, escape_html};

use crate::references::{REF_ATTR, REF_PREFIX};

/// How interpolated values enter the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    /// HTML-escape values; content markers are labelled with their key
    #[default]
    Escape,
    /// Insert values verbatim; content markers start empty
    Raw,
}

/// Static strings interleaved with interpolated values.
///
/// There is always one more string than there are values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    strings: Vec<String>,
    values: Vec<String>,
}

impl Template {
    pub fn new() -> Self {
        Self { strings: vec![String::new()], values: Vec::new() }
    }

    /// Build from the two halves of a literal template.
    ///
    /// Values without a following string are still interpolated.
    pub fn from_parts<S: AsRef<str>, V: Display>(strings: &[S], values: &[V]) -> Self {
        let mut template = Self::new();
        for (i, s) in strings.iter().enumerate() {
            template = template.text(s.as_ref());
            if let Some(value) = values.get(i) {
                template = template.value(value);
            }
        }
        for value in values.iter().skip(strings.len()) {
            template = template.value(value);
        }
        template
    }

    /// Append static markup
    pub fn text(mut self, markup: &str) -> Self {
        if let Some(last) = self.strings.last_mut() {
            last.push_str(markup);
        }
        self
    }

    /// Append an interpolated value
    pub fn value(mut self, value: impl Display) -> Self {
        self.values.push(value.to_string());
        self.strings.push(String::new());
        self
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Template {
    fn from(markup: &str) -> Self {
        Self::new().text(markup)
    }
}

/// What a placeholder binds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// Element text content (or `src` for images)
    Content,
    /// The named DOM attribute
    Attribute(String),
}

/// A placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Property name the marker reads
    pub key: String,
    pub kind: BindingKind,
}

/// Tokenized template markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Binding(Binding),
}

/// Split markup into static text and placeholder bindings in one pass
pub fn tokenize(markup: &str) -> Vec<Segment> {
    let bytes = markup.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some((key, end)) = placeholder_at(bytes, i) else {
            i += 1;
            continue;
        };
        let key = markup[key].to_string();

        if let Some(name_start) = attribute_name_start(bytes, text_start, i, end) {
            push_text(&mut segments, &markup[text_start..name_start]);
            let name = markup[name_start..i - 2].to_string();
            segments.push(Segment::Binding(Binding { key, kind: BindingKind::Attribute(name) }));
            // skip the closing quote
            i = end + 1;
        } else {
            push_text(&mut segments, &markup[text_start..i]);
            segments.push(Segment::Binding(Binding { key, kind: BindingKind::Content }));
            i = end;
        }
        text_start = i;
    }

    push_text(&mut segments, &markup[text_start..]);
    segments
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// `({key})` at `start`: the key's byte range and the index past `)`
fn placeholder_at(bytes: &[u8], start: usize) -> Option<(Range<usize>, usize)> {
    if bytes.get(start) != Some(&b'(') || bytes.get(start + 1) != Some(&b'{') {
        return None;
    }
    let key_start = start + 2;
    let mut key_end = key_start;
    while bytes.get(key_end).copied().is_some_and(is_key_byte) {
        key_end += 1;
    }
    if key_end == key_start
        || bytes.get(key_end) != Some(&b'}')
        || bytes.get(key_end + 1) != Some(&b')')
    {
        return None;
    }
    Some((key_start..key_end, key_end + 2))
}

/// Start of `name` when the placeholder at `open..end` reads `name="({key})"`.
/// The name may not reach back before `floor`.
fn attribute_name_start(bytes: &[u8], floor: usize, open: usize, end: usize) -> Option<usize> {
    if open < floor + 2
        || bytes[open - 1] != b'"'
        || bytes[open - 2] != b'='
        || bytes.get(end) != Some(&b'"')
    {
        return None;
    }
    let name_end = open - 2;
    let mut start = name_end;
    while start > floor && is_attr_name_byte(bytes[start - 1]) {
        start -= 1;
    }
    (start < name_end).then_some(start)
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_attr_name_byte(b: u8) -> bool {
    is_key_byte(b) || b == b'-'
}

/// Compiles templates into detached fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCompiler {
    policy: EscapePolicy,
}

impl TemplateCompiler {
    pub fn new(policy: EscapePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EscapePolicy {
        self.policy
    }

    /// Strings and values joined in order, values escaped per policy
    pub fn concat(&self, template: &Template) -> String {
        let mut output = String::new();
        for (i, s) in template.strings.iter().enumerate() {
            output.push_str(s);
            if let Some(value) = template.values.get(i) {
                match self.policy {
                    EscapePolicy::Escape => output.push_str(&escape_html(value)),
                    EscapePolicy::Raw => output.push_str(value),
                }
            }
        }
        output
    }

    /// Tokenized form of the joined template
    pub fn segments(&self, template: &Template) -> Vec<Segment> {
        tokenize(&self.concat(template))
    }

    /// Final markup with placeholders rewritten into markers
    pub fn markup(&self, template: &Template) -> String {
        let mut output = String::new();
        for segment in self.segments(template) {
            match segment {
                Segment::Text(text) => output.push_str(&text),
                Segment::Binding(Binding { key, kind: BindingKind::Content }) => {
                    let label = match self.policy {
                        EscapePolicy::Escape => escape_html(&key),
                        EscapePolicy::Raw => String::new(),
                    };
                    output.push_str(&format!(r#"<span {REF_ATTR}="{key}">{label}</span>"#));
                }
                Segment::Binding(Binding { key, kind: BindingKind::Attribute(name) }) => {
                    output.push_str(&format!(
                        r#"{name}="" {REF_PREFIX}{name}="{key}" {REF_ATTR}="""#
                    ));
                }
            }
        }
        output
    }

    /// Compile into a fresh fragment cloned from a parsed `<template>`
    pub fn compile(&self, template: &Template) -> DomTree {
        TemplateElement::parse(&self.markup(template)).clone_content()
    }
}

/// Compile with the default escaping policy
pub fn html(template: &Template) -> DomTree {
    TemplateCompiler::default().compile(template)
}
