//! Arena-backed syntax tree
//!
//! Nodes live in a single arena and are addressed by [`NodeId`]. Removing a
//! node only detaches it from its parent: the node and its subtree stay in
//! the arena but become unreachable from the root, so ids held by callers
//! never dangle.

use crate::types::Type;
use serde::{Deserialize, Serialize};

/// Index of a node in a [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntax node kinds
///
/// Child layout per kind:
/// - `Interface`: members (`Property`, `MemberFunction`, ...)
/// - `Property`: optional `TypeRef`
/// - `Class`: optional primary-constructor `ParameterList`, `SuperTypeEntry`s, members
/// - `SuperTypeEntry`: call arguments (only when `call` is set)
/// - `Function`: `ParameterList`, then the body (`Block` or an expression)
/// - `Parameter`: optional `TypeRef`
/// - `Lambda`: a `Block`
/// - `Call`: callee, arguments, optional trailing `Lambda`
/// - `Assign`: lvalue, rvalue
/// - `DotQualified`: receiver, selector
/// - `If`: condition, then `Block`, optional else `Block`
/// - `While`: condition, body `Block`
/// - `Return` / `Throw`: optional expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    File { name: String },
    Interface { name: String, supertypes: Vec<Type> },
    Property {
        name: Option<String>,
        mutable: bool,
        receiver: Option<Type>,
        synthesized: bool,
    },
    MemberFunction { name: String },
    Class { name: String },
    SuperTypeEntry { ty: Type, call: bool },
    Function {
        name: Option<String>,
        receiver: Option<Type>,
        is_override: bool,
    },
    ParameterList,
    Parameter { name: String, default: Option<String> },
    TypeRef { ty: Type },
    Block,
    Lambda,
    Call,
    ClassLiteral { name: String },
    Assign,
    DotQualified,
    NameRef { name: String },
    Literal { text: String },
    If,
    While,
    Return,
    Throw,
    Break,
    Continue,
    Whitespace { text: String },
    Comment { text: String },
}

impl NodeKind {
    /// Whitespace and comments carry no semantics
    pub fn is_trivia(&self) -> bool {
        matches!(self, NodeKind::Whitespace { .. } | NodeKind::Comment { .. })
    }

    /// Declared name of named declarations
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::File { name }
            | NodeKind::Interface { name, .. }
            | NodeKind::MemberFunction { name }
            | NodeKind::Class { name }
            | NodeKind::Parameter { name, .. }
            | NodeKind::NameRef { name } => Some(name),
            NodeKind::Property { name, .. } | NodeKind::Function { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable syntax tree rooted at a `File` node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn new(file_name: impl Into<String>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::File {
            name: file_name.into(),
        });
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached node
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached node with the given children
    pub fn alloc_with(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let id = self.alloc(kind);
        for &child in children {
            self.append_child(id, child);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Children that are not whitespace or comments
    pub fn significant_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| !self.kind(child).is_trivia())
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index.checked_sub(1).map(|i| self.children(parent)[i])
    }

    /// Strict ancestors, innermost first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// Nearest common ancestor, counting each node as its own ancestor
    pub fn nearest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut a_chain = vec![a];
        a_chain.extend(self.ancestors(a));
        std::iter::once(b)
            .chain(self.ancestors(b))
            .find(|candidate| a_chain.contains(candidate))
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// First child matching `predicate`
    pub fn find_child(&self, id: NodeId, predicate: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| predicate(self.kind(child)))
    }

    /// Innermost strict ancestor matching `predicate`
    pub fn find_ancestor(&self, id: NodeId, predicate: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&a| predicate(self.kind(a)))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.index()].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Insert `node` right after `anchor`; returns false when `anchor` has no parent
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        self.detach(node);
        match self.index_in_parent(anchor) {
            Some(index) => {
                self.insert_child(parent, index + 1, node);
                true
            }
            None => false,
        }
    }

    /// Insert `node` right before `anchor`; returns false when `anchor` has no parent
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> bool {
        let Some(parent) = self.parent(anchor) else {
            return false;
        };
        self.detach(node);
        match self.index_in_parent(anchor) {
            Some(index) => {
                self.insert_child(parent, index, node);
                true
            }
            None => false,
        }
    }

    /// Unlink a node from its parent; the subtree stays in the arena
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != id);
        }
    }

    /// Put `new` in the place of `old`; `old` ends up detached
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        if old == new {
            return true;
        }
        if self.insert_before(old, new) {
            self.detach(old);
            true
        } else {
            false
        }
    }
}

/// Iterator over strict ancestors
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
