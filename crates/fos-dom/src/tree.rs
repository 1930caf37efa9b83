//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so `NodeId`s
//! stay valid for the lifetime of the tree.

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree rooted at a document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Create a tree rooted at a document fragment
    pub fn fragment() -> Self {
        Self { nodes: vec![Node::fragment()] }
    }

    /// Root node (document or fragment)
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push(Node::fragment())
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A document fragment child is emptied into `parent` instead of being
    /// inserted itself.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.node(parent)?.is_container() {
            return Err(DomError::InvalidNodeType);
        }
        let child_data = &self.node(child)?.data;
        if matches!(child_data, NodeData::Document | NodeData::ShadowRoot(_)) {
            return Err(DomError::HierarchyRequest);
        }
        if matches!(child_data, NodeData::DocumentFragment) {
            for grandchild in self.child_ids(child) {
                self.append_child(parent, grandchild)?;
            }
            return Ok(());
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach every child of `id`
    pub fn remove_children(&mut self, id: NodeId) {
        for child in self.child_ids(id) {
            self.detach(child);
        }
    }

    /// Parent of a node (NONE for roots and detached nodes)
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.get(id).map_or(NodeId::NONE, |n| n.parent)
    }

    /// Check if `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Check whether a node is reachable from the document root,
    /// stepping out of shadow trees through their hosts
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            match &node.data {
                NodeData::Document => return true,
                NodeData::ShadowRoot(shadow) => current = shadow.host,
                _ => current = node.parent,
            }
        }
        false
    }

    /// Iterate direct children as `(id, node)` pairs
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Collected child IDs, safe to hold across mutation
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    ///
    /// Shadow trees are not entered.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Element data for a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data for a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<Option<String>> {
        let elem = self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        Ok(elem.set_attr(name, value))
    }

    /// Remove an attribute, returning its value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let elem = self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        Ok(elem.remove_attr(name))
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children with a single text node (none for empty text)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.data {
            NodeData::Text(content) | NodeData::Comment(content) => {
                *content = text.to_string();
                return Ok(());
            }
            NodeData::Doctype { .. } | NodeData::Document => {
                return Err(DomError::InvalidNodeType);
            }
            _ => {}
        }

        // Rewrite a lone text child in place; the arena never frees nodes
        let first = self.node(id)?.first_child;
        if !text.is_empty() && first.is_valid() && self.node(first)?.next_sibling == NodeId::NONE {
            if let NodeData::Text(content) = &mut self.node_mut(first)?.data {
                *content = text.to_string();
                return Ok(());
            }
        }

        self.remove_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }

    /// Deep-copy `node` (and its shadow tree) from `source` into this tree.
    ///
    /// The copy is detached; its ID is returned.
    pub fn import_node(&mut self, source: &DomTree, node: NodeId) -> DomResult<NodeId> {
        let data = match &source.node(node)?.data {
            NodeData::Element(elem) => NodeData::Element(ElementData {
                shadow_root: NodeId::NONE,
                ..elem.clone()
            }),
            NodeData::ShadowRoot(_) | NodeData::Document => NodeData::DocumentFragment,
            other => other.clone(),
        };
        let id = self.push(Node::with_data(data));

        for (child, _) in source.children(node) {
            let imported = self.import_node(source, child)?;
            self.append_child(id, imported)?;
        }

        if let Some(shadow) = source.element(node).map(|e| e.shadow_root).filter(|s| s.is_valid()) {
            let mode = source.node(shadow)?
                .as_shadow_root()
                .map(|s| s.mode)
                .unwrap_or_default();
            let shadow_copy = self.attach_shadow(id, mode)?;
            for (child, _) in source.children(shadow) {
                let imported = self.import_node(source, child)?;
                self.append_child(shadow_copy, imported)?;
            }
        }
        Ok(id)
    }

    /// Import the children of `fragment` from `source` and append them to `parent`
    pub fn append_fragment(&mut self, parent: NodeId, source: &DomTree, fragment: NodeId) -> DomResult<()> {
        for (child, _) in source.children(fragment) {
            let imported = self.import_node(source, child)?;
            self.append_child(parent, imported)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
            }
        };
        Some(current)
    }
}
