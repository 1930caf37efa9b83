//! Shadow DOM
//!
//! A shadow root lives in the same arena as its host but is never one of
//! the host's children, so tree walks and selector queries started outside
//! it cannot reach its contents.

use crate::{DomError, DomResult, DomTree, Node, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root data
#[derive(Debug, Clone)]
pub struct ShadowRootData {
    pub host: NodeId,
    pub mode: ShadowRootMode,
}

impl DomTree {
    /// Attach a shadow root to an element
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        let elem = self.element(host).ok_or(DomError::InvalidNodeType)?;
        if elem.shadow_root.is_valid() {
            return Err(DomError::ShadowRootExists);
        }

        let shadow = self.push(Node::shadow_root(ShadowRootData { host, mode }));
        if let Some(elem) = self.element_mut(host) {
            elem.shadow_root = shadow;
        }
        tracing::trace!(?host, ?shadow, ?mode, "attached shadow root");
        Ok(shadow)
    }

    /// Shadow root of a host, if any
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)
            .map(|e| e.shadow_root)
            .filter(|s| s.is_valid())
    }

    /// Host of a shadow root
    pub fn shadow_host(&self, shadow: NodeId) -> Option<NodeId> {
        self.get(shadow)?.as_shadow_root().map(|s| s.host)
    }
}
