//! Staged tree edits
//!
//! Codegen first decides every edit against an immutable tree, then applies
//! the whole plan in one pass. Nodes created by earlier edits of the same
//! plan are addressed through [`Anchor::Pending`].

use crate::error::CodegenError;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;
use tracing::trace;

/// Position reference for an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Existing(NodeId),
    /// The n-th node created while applying the plan
    Pending(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Set the written type of a parameter
    ReplaceType { parameter: NodeId, ty: Type },
    /// Insert `name: ty` into `list` after `after`, or first when `None`
    InsertParameter {
        list: NodeId,
        after: Option<Anchor>,
        name: String,
        ty: Option<Type>,
    },
    /// Insert `<receiver>.<field> = <field>` into `block` after `after`, or first when `None`
    InsertStatement {
        block: NodeId,
        after: Option<Anchor>,
        receiver: String,
        field: String,
    },
    /// Detach a statement together with a directly following whitespace node
    RemoveStatement { statement: NodeId },
    RemoveParameter { parameter: NodeId },
    /// Rename a parameter or a name reference
    Rename { node: NodeId, name: String },
}

impl Edit {
    fn creates_node(&self) -> bool {
        matches!(self, Edit::InsertParameter { .. } | Edit::InsertStatement { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    edits: Vec<Edit>,
    pending: usize,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit; returns the pending anchor of the node it creates, if any
    pub fn push(&mut self, edit: Edit) -> Option<Anchor> {
        let created = edit.creates_node().then(|| {
            let anchor = Anchor::Pending(self.pending);
            self.pending += 1;
            anchor
        });
        self.edits.push(edit);
        created
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Check that every existing node the plan touches is still attached
    pub fn validate(&self, tree: &SyntaxTree) -> Result<(), CodegenError> {
        let attached = |node: NodeId| {
            if tree.contains(node) && tree.is_attached(node) {
                Ok(())
            } else {
                Err(CodegenError::DetachedNode(node))
            }
        };
        let anchor = |after: &Option<Anchor>| match after {
            Some(Anchor::Existing(node)) => attached(*node),
            _ => Ok(()),
        };
        for edit in &self.edits {
            match edit {
                Edit::ReplaceType { parameter, .. } => attached(*parameter)?,
                Edit::InsertParameter { list, after, .. } => {
                    attached(*list)?;
                    anchor(after)?;
                }
                Edit::InsertStatement { block, after, .. } => {
                    attached(*block)?;
                    anchor(after)?;
                }
                Edit::RemoveStatement { statement } => attached(*statement)?,
                Edit::RemoveParameter { parameter } => attached(*parameter)?,
                Edit::Rename { node, .. } => {
                    attached(*node)?;
                    if !matches!(tree.kind(*node), NodeKind::Parameter { .. } | NodeKind::NameRef { .. }) {
                        return Err(CodegenError::NotRenamable(*node));
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply every edit in order; returns the number of edits applied
    pub fn apply(self, tree: &mut SyntaxTree) -> Result<usize, CodegenError> {
        self.validate(tree)?;
        let mut created: Vec<NodeId> = Vec::with_capacity(self.pending);
        let count = self.edits.len();
        for edit in self.edits {
            trace!(?edit, "applying edit");
            match edit {
                Edit::ReplaceType { parameter, ty } => match tree.type_ref(parameter) {
                    Some(type_ref) => *tree.kind_mut(type_ref) = NodeKind::TypeRef { ty },
                    None => {
                        let type_ref = tree.new_type_ref(ty);
                        tree.append_child(parameter, type_ref);
                    }
                },
                Edit::InsertParameter {
                    list,
                    after,
                    name,
                    ty,
                } => {
                    let parameter = tree.new_parameter(&name, ty, None);
                    insert(tree, list, resolve(&created, after), parameter);
                    created.push(parameter);
                }
                Edit::InsertStatement {
                    block,
                    after,
                    receiver,
                    field,
                } => {
                    let statement = tree.new_member_assignment(&receiver, &field, &field);
                    insert(tree, block, resolve(&created, after), statement);
                    let newline = tree.new_newline();
                    tree.insert_after(statement, newline);
                    created.push(statement);
                }
                Edit::RemoveStatement { statement } => {
                    if let Some(next) = tree.next_sibling(statement) {
                        if matches!(tree.kind(next), NodeKind::Whitespace { .. }) {
                            tree.detach(next);
                        }
                    }
                    tree.detach(statement);
                }
                Edit::RemoveParameter { parameter } => tree.detach(parameter),
                Edit::Rename { node, name: new_name } => match tree.kind_mut(node) {
                    NodeKind::Parameter { name, .. } | NodeKind::NameRef { name } => *name = new_name,
                    _ => {}
                },
            }
        }
        Ok(count)
    }
}

/// Pending anchors always name a node created by an earlier edit of the same plan
fn resolve(created: &[NodeId], anchor: Option<Anchor>) -> Option<NodeId> {
    match anchor? {
        Anchor::Existing(node) => Some(node),
        Anchor::Pending(index) => created.get(index).copied(),
    }
}

/// Insert after `anchor` when it still sits in `parent`, otherwise first in `parent`
fn insert(tree: &mut SyntaxTree, parent: NodeId, anchor: Option<NodeId>, node: NodeId) {
    match anchor {
        Some(anchor) if tree.parent(anchor) == Some(parent) => {
            tree.insert_after(anchor, node);
        }
        _ => tree.insert_child(parent, 0, node),
    }
}
