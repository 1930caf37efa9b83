//! Edge case tests for fos-html
//!
//! Malformed markup and unusual input inside templates.

use fos_html::{inner_html, parse_fragment};

#[test]
fn test_parse_null_bytes() {
    let fragment = parse_fragment("Hello\0World");
    assert!(fragment.len() > 1);
}

#[test]
fn test_parse_unclosed_tags() {
    let fragment = parse_fragment("<div><p><span>text");
    assert_eq!(inner_html(&fragment), "<div><p><span>text</span></p></div>");
}

#[test]
fn test_stray_end_tag_ignored() {
    let fragment = parse_fragment("<p>a</span>b</p>");
    assert_eq!(inner_html(&fragment), "<p>ab</p>");
}

#[test]
fn test_entities_decoded() {
    let fragment = parse_fragment("&lt;script&gt;");
    assert_eq!(fragment.text_content(fragment.root()), "<script>");
    assert_eq!(inner_html(&fragment), "&lt;script&gt;");
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let fragment = parse_fragment(r#"<b data-ref="" data-ref="x"></b>"#);
    let b = fragment.child_ids(fragment.root())[0];
    assert_eq!(fragment.get_attribute(b, "data-ref"), Some(""));
}

#[test]
fn test_unicode_text() {
    let fragment = parse_fragment("<p>héllo 世界 🎉</p>");
    assert_eq!(fragment.text_content(fragment.root()), "héllo 世界 🎉");
}
