//! Attribute/property name conversion
//!
//! Same rules as `dataset`: hyphenated attribute names map to camelCase
//! property names.

/// Convert kebab-case to camelCase (`first-name` -> `firstName`)
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
