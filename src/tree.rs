//! Arena-backed generic tree.
//!
//! Nodes live in a `Vec` owned by the [`Tree`] and refer to each other by
//! [`NodeRef`] index, so the parent back-reference never forms an ownership
//! cycle. Each node also carries a [`NodeId`] drawn from a counter the tree
//! owns; seed a new tree with [`Tree::next_id`] of the previous one to keep
//! ids unique across several trees.

use std::fmt;

/// Monotonic node identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const FIRST: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a node inside one particular tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(usize);

impl NodeRef {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Rejected structural change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("attaching node {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// A node: kind, payload, display name and links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K, P> {
    pub id: NodeId,
    pub kind: K,
    pub payload: P,
    pub name: String,
    parent: Option<NodeRef>,
    children: Vec<NodeRef>,
}

impl<K, P> Node<K, P> {
    #[must_use]
    pub const fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }
}

/// Append-only tree of `Node<K, P>`.
#[derive(Debug, Clone)]
pub struct Tree<K, P> {
    nodes: Vec<Node<K, P>>,
    next_id: u64,
}

impl<K, P> Default for Tree<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> Tree<K, P> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_first_id(NodeId::FIRST)
    }

    /// Empty tree whose first node gets `first` as id.
    #[must_use]
    pub const fn with_first_id(first: NodeId) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: first.0,
        }
    }

    /// Id the next created node will get.
    #[must_use]
    pub const fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: K, payload: P, name: impl Into<String>) -> NodeRef {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            kind,
            payload,
            name: name.into(),
            parent: None,
            children: Vec::new(),
        });
        NodeRef(self.nodes.len() - 1)
    }

    /// Move `child` under `parent`, after its existing children.
    ///
    /// # Panics
    ///
    /// Panics if either handle comes from another tree.
    pub fn add_child(&mut self, parent: NodeRef, child: NodeRef) -> Result<(), TreeError> {
        self.set_parent(child, parent)?;
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Create a node directly under `parent`. A fresh node has no parent
    /// and no children, so this cannot fail.
    pub fn append(&mut self, parent: NodeRef, kind: K, payload: P, name: impl Into<String>) -> NodeRef {
        let child = self.create(kind, payload, name);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        child
    }

    fn set_parent(&mut self, child: NodeRef, parent: NodeRef) -> Result<(), TreeError> {
        let child_id = self.nodes[child.0].id;
        if self.nodes[child.0].parent.is_some() {
            return Err(TreeError::AlreadyAttached(child_id));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(TreeError::Cycle {
                parent: self.nodes[parent.0].id,
                child: child_id,
            });
        }
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, node: NodeRef) -> &Node<K, P> {
        &self.nodes[node.0]
    }

    #[must_use]
    pub fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes[node.0].parent
    }

    #[must_use]
    pub fn children(&self, node: NodeRef) -> &[NodeRef] {
        &self.nodes[node.0].children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node<K, P>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeRef(i), n))
    }

    /// `node` itself, then its parent, up to the root.
    pub fn ancestors(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        std::iter::successors(Some(node), |n| self.nodes[n.0].parent)
    }

    /// Pre-order walk of `node`'s subtree, `node` included, with depths.
    #[must_use]
    pub fn descendants(&self, node: NodeRef) -> Vec<(NodeRef, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(node, 0)];
        while let Some((current, depth)) = stack.pop() {
            out.push((current, depth));
            for &child in self.nodes[current.0].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}
