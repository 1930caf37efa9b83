//! Selector queries
//!
//! Supports the subset of selectors components use for scoped lookups:
//! type, universal, `#id`, `.class`, `[attr]` and `[attr=value]` compounds,
//! joined by descendant or child combinators, in comma-separated lists.

use crate::{DomTree, NodeId};

/// Parsed selector list
#[derive(Debug, Clone)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Compounds joined by combinators, stored right to left
#[derive(Debug, Clone)]
struct Complex {
    subject: Compound,
    ancestry: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

#[derive(Debug, Clone)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("selector ended unexpectedly")]
    UnexpectedEnd,

    #[error("unterminated attribute selector")]
    Unterminated,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { chars: input.chars().collect(), pos: 0 };
        let mut alternatives = vec![parser.complex()?];
        while parser.peek() == Some(',') {
            parser.bump();
            alternatives.push(parser.complex()?);
        }
        Ok(Self { alternatives })
    }

    /// Check if an element matches any alternative
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(tree, node))
    }
}

impl Complex {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.subject.matches(tree, node) && match_ancestry(tree, node, &self.ancestry)
    }
}

fn match_ancestry(tree: &DomTree, node: NodeId, ancestry: &[(Combinator, Compound)]) -> bool {
    let Some(((combinator, compound), rest)) = ancestry.split_first() else {
        return true;
    };
    match combinator {
        Combinator::Child => {
            let parent = tree.parent(node);
            compound.matches(tree, parent) && match_ancestry(tree, parent, rest)
        }
        Combinator::Descendant => {
            let mut current = tree.parent(node);
            while current.is_valid() {
                if compound.matches(tree, current) && match_ancestry(tree, current, rest) {
                    return true;
                }
                current = tree.parent(current);
            }
            false
        }
    }
}

impl Compound {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !elem.name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| elem.has_class(c))
            && self.attributes.iter().all(|a| match a {
                AttrMatch::Exists(name) => elem.has_attr(name),
                AttrMatch::Equals(name, value) => elem.get_attr(name) == Some(value.as_str()),
            })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected { found, offset: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_space => combinators.push(Combinator::Descendant),
                Some(_) => return Err(self.unexpected()),
            }
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or(SelectorError::Empty)?;
        let ancestry = combinators.into_iter().rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(Complex { subject, ancestry })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek() {
            Some('*') => {
                self.bump();
                any = true;
            }
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(AttrMatch::Exists(name))
            }
            Some('=') => {
                self.bump();
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        let start = self.pos;
                        while self.peek().is_some_and(|c| c != quote) {
                            self.bump();
                        }
                        if self.peek().is_none() {
                            return Err(SelectorError::Unterminated);
                        }
                        let value = self.chars[start..self.pos].iter().collect();
                        self.bump();
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                if self.peek() != Some(']') {
                    return Err(if self.peek().is_none() {
                        SelectorError::Unterminated
                    } else {
                        self.unexpected()
                    });
                }
                self.bump();
                Ok(AttrMatch::Equals(name, value))
            }
            None => Err(SelectorError::Unterminated),
            Some(_) => Err(self.unexpected()),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl DomTree {
    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope).find(|&id| selector.matches(self, id))
    }

    /// All descendants of `scope` matching `selector`, in tree order
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let section = tree.create_element("section");
        tree.set_attribute(section, "id", "profile").unwrap();
        let p = tree.create_element("p");
        tree.set_attribute(p, "class", "intro lead").unwrap();
        let span = tree.create_element("span");
        tree.set_attribute(span, "data-ref", "name").unwrap();
        tree.append_child(tree.root(), section).unwrap();
        tree.append_child(section, p).unwrap();
        tree.append_child(p, span).unwrap();
        (tree, section, p, span)
    }

    fn query(tree: &DomTree, selector: &str) -> Vec<NodeId> {
        let selector = Selector::parse(selector).unwrap();
        tree.query_selector_all(tree.root(), &selector)
    }

    #[test]
    fn test_simple_selectors() {
        let (tree, section, p, span) = sample();
        assert_eq!(query(&tree, "section"), vec![section]);
        assert_eq!(query(&tree, "#profile"), vec![section]);
        assert_eq!(query(&tree, ".lead"), vec![p]);
        assert_eq!(query(&tree, "[data-ref]"), vec![span]);
        assert_eq!(query(&tree, "[data-ref=name]"), vec![span]);
        assert_eq!(query(&tree, "[data-ref='name']"), vec![span]);
        assert!(query(&tree, "[data-ref=\"other\"]").is_empty());
        assert_eq!(query(&tree, "*").len(), 3);
    }

    #[test]
    fn test_compound_and_combinators() {
        let (tree, section, p, span) = sample();
        assert_eq!(query(&tree, "p.intro.lead"), vec![p]);
        assert_eq!(query(&tree, "section span"), vec![span]);
        assert_eq!(query(&tree, "section > p"), vec![p]);
        assert!(query(&tree, "section > span").is_empty());
        assert_eq!(query(&tree, "#profile > .intro > [data-ref]"), vec![span]);
        assert_eq!(query(&tree, "span, section"), vec![section, span]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("  ").unwrap_err(), SelectorError::Empty);
        assert_eq!(Selector::parse("[data-ref").unwrap_err(), SelectorError::Unterminated);
        assert_eq!(Selector::parse("[a='x]").unwrap_err(), SelectorError::Unterminated);
        assert!(matches!(
            Selector::parse("p > > span").unwrap_err(),
            SelectorError::Unexpected { found: '>', .. }
        ));
        assert_eq!(Selector::parse("p >").unwrap_err(), SelectorError::UnexpectedEnd);
    }

    #[test]
    fn test_query_selector_first_match() {
        let (mut tree, section, _, _) = sample();
        let second = tree.create_element("p");
        tree.append_child(section, second).unwrap();
        let selector = Selector::parse("p").unwrap();
        let first = tree.query_selector(tree.root(), &selector);
        assert_ne!(first, Some(second));
        assert_eq!(tree.query_selector_all(tree.root(), &selector).len(), 2);
    }
}
