//! Front-end abstraction
//!
//! The analysis never looks at source text. Everything it needs from a
//! language front-end (the tree, symbol resolution, static types, per-body
//! control flow and reference search) goes through [`FrontEnd`].
//! [`SourceFrontEnd`] is the reference implementation over a [`SyntaxTree`].

mod lower;
mod resolve;

use crate::config::AnalysisConfig;
use crate::dataflow::cfg::Pseudocode;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;
use tracing::debug;

pub use lower::CfgBuilder;

/// Services consumed from a language front-end
pub trait FrontEnd {
    fn tree(&self) -> &SyntaxTree;

    fn config(&self) -> &AnalysisConfig;

    /// Declaration a reference (name or class literal) resolves to
    fn resolve(&self, reference: NodeId) -> Option<NodeId>;

    /// Static type of an expression
    fn type_of(&self, expression: NodeId) -> Option<Type>;

    /// Declared type of a parameter, property or type declaration
    fn declared_type(&self, declaration: NodeId) -> Option<Type>;

    /// Control flow of a function or lambda body
    fn control_flow(&self, owner: NodeId) -> Option<Pseudocode>;

    /// All references to `declaration` in the tree
    fn find_call_sites(&self, declaration: NodeId) -> Vec<NodeId>;
}

/// Reference front-end over an in-memory tree
#[derive(Debug, Clone, Copy)]
pub struct SourceFrontEnd<'a> {
    tree: &'a SyntaxTree,
    config: &'a AnalysisConfig,
}

impl<'a> SourceFrontEnd<'a> {
    pub fn new(tree: &'a SyntaxTree, config: &'a AnalysisConfig) -> Self {
        Self { tree, config }
    }
}

impl FrontEnd for SourceFrontEnd<'_> {
    fn tree(&self) -> &SyntaxTree {
        self.tree
    }

    fn config(&self) -> &AnalysisConfig {
        self.config
    }

    fn resolve(&self, reference: NodeId) -> Option<NodeId> {
        match self.tree.kind(reference) {
            NodeKind::NameRef { .. } => self.resolve_reference(reference),
            NodeKind::ClassLiteral { name } => self
                .tree
                .find_top_level(name, |k| matches!(k, NodeKind::Class { .. })),
            _ => None,
        }
    }

    fn type_of(&self, expression: NodeId) -> Option<Type> {
        self.expression_type(expression)
    }

    fn declared_type(&self, declaration: NodeId) -> Option<Type> {
        self.declared_type_of(declaration)
    }

    fn control_flow(&self, owner: NodeId) -> Option<Pseudocode> {
        let body = match self.tree.kind(owner) {
            NodeKind::Lambda => self.tree.lambda_block(owner),
            NodeKind::Function { .. } => self.tree.function_body(owner),
            NodeKind::Block => Some(owner),
            _ => None,
        };
        let Some(body) = body else {
            debug!(owner = ?owner, "no body to lower");
            return None;
        };
        Some(CfgBuilder::new(self, owner).build(body))
    }

    fn find_call_sites(&self, declaration: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&node| {
                matches!(
                    self.tree.kind(node),
                    NodeKind::NameRef { .. } | NodeKind::ClassLiteral { .. }
                ) && self.resolve(node) == Some(declaration)
            })
            .collect()
    }
}
