//! Typed accessors over the child layout of each node kind

use super::tree::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;

impl SyntaxTree {
    /// Parameter list of a function, or primary constructor of a class
    pub fn parameter_list(&self, decl: NodeId) -> Option<NodeId> {
        match self.kind(decl) {
            NodeKind::Function { .. } | NodeKind::Class { .. } => {
                self.find_child(decl, |k| matches!(k, NodeKind::ParameterList))
            }
            _ => None,
        }
    }

    pub fn parameters(&self, decl: NodeId) -> Vec<NodeId> {
        self.parameter_list(decl)
            .map(|list| {
                self.children(list)
                    .iter()
                    .copied()
                    .filter(|&p| matches!(self.kind(p), NodeKind::Parameter { .. }))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body of a function: a `Block` or a single expression
    pub fn function_body(&self, function: NodeId) -> Option<NodeId> {
        if !matches!(self.kind(function), NodeKind::Function { .. }) {
            return None;
        }
        self.significant_children(function)
            .find(|&c| !matches!(self.kind(c), NodeKind::ParameterList))
    }

    pub fn lambda_block(&self, lambda: NodeId) -> Option<NodeId> {
        if !matches!(self.kind(lambda), NodeKind::Lambda) {
            return None;
        }
        self.find_child(lambda, |k| matches!(k, NodeKind::Block))
    }

    /// Significant statements of a block
    pub fn statements(&self, block: NodeId) -> Vec<NodeId> {
        self.significant_children(block).collect()
    }

    pub fn call_callee(&self, call: NodeId) -> Option<NodeId> {
        match self.kind(call) {
            NodeKind::Call => self.children(call).first().copied(),
            _ => None,
        }
    }

    pub fn callee_name(&self, call: NodeId) -> Option<&str> {
        let callee = self.call_callee(call)?;
        match self.kind(callee) {
            NodeKind::NameRef { name } => Some(name),
            _ => None,
        }
    }

    /// Value arguments of a call, trailing lambda excluded
    pub fn call_arguments(&self, call: NodeId) -> Vec<NodeId> {
        let lambda = self.call_lambda(call);
        match self.kind(call) {
            NodeKind::Call => self
                .children(call)
                .iter()
                .skip(1)
                .copied()
                .filter(|&c| Some(c) != lambda)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn call_lambda(&self, call: NodeId) -> Option<NodeId> {
        if !matches!(self.kind(call), NodeKind::Call) {
            return None;
        }
        let children = self.children(call);
        match children.split_first() {
            Some((_, rest)) => rest
                .last()
                .copied()
                .filter(|&last| matches!(self.kind(last), NodeKind::Lambda)),
            None => None,
        }
    }

    /// `(lhs, rhs)` of an assignment or `(receiver, selector)` of a qualified expression
    pub fn operands(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        match self.kind(node) {
            NodeKind::Assign | NodeKind::DotQualified => match self.children(node) {
                [left, right] => Some((*left, *right)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn type_ref(&self, decl: NodeId) -> Option<NodeId> {
        self.find_child(decl, |k| matches!(k, NodeKind::TypeRef { .. }))
    }

    /// Type written on a property or parameter declaration
    pub fn written_type(&self, decl: NodeId) -> Option<&Type> {
        match self.kind(self.type_ref(decl)?) {
            NodeKind::TypeRef { ty } => Some(ty),
            _ => None,
        }
    }

    pub fn super_type_entries(&self, class: NodeId) -> Vec<NodeId> {
        self.children(class)
            .iter()
            .copied()
            .filter(|&c| matches!(self.kind(c), NodeKind::SuperTypeEntry { .. }))
            .collect()
    }

    /// Members of an interface or class body
    pub fn members(&self, container: NodeId) -> Vec<NodeId> {
        match self.kind(container) {
            NodeKind::Interface { .. } => self.significant_children(container).collect(),
            NodeKind::Class { .. } => self
                .significant_children(container)
                .filter(|&c| {
                    !matches!(
                        self.kind(c),
                        NodeKind::ParameterList | NodeKind::SuperTypeEntry { .. }
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Top-level declaration named `name` satisfying `predicate`
    pub fn find_top_level(&self, name: &str, predicate: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.significant_children(self.root())
            .find(|&decl| self.name(decl) == Some(name) && predicate(self.kind(decl)))
    }

    /// Innermost enclosing container whose children include top-level or member declarations
    pub fn declaration_container(&self, decl: NodeId) -> Option<NodeId> {
        self.find_ancestor(decl, |k| matches!(k, NodeKind::File { .. } | NodeKind::Class { .. }))
    }

    /// Name of a `NameRef` node
    pub fn reference_name(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::NameRef { name } => Some(name),
            _ => None,
        }
    }
}
