//! Builder functions and construction expressions
//!
//! A builder function has the shape
//! `fun RBuilder.playground(...) = child(Playground::class) { ... }`; the
//! `child(...) { ... }` call is its construction expression.

use super::ComponentDeclaration;
use crate::dataflow::{BuilderWriteMatcher, CfgSolver, FieldAssignmentState};
use crate::fields::{analyze, Field};
use crate::frontend::FrontEnd;
use crate::gaps::{compute_gaps, GapReport};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderFunction {
    pub component: ComponentDeclaration,
    pub function: NodeId,
}

impl BuilderFunction {
    /// View an arbitrary function as a builder function, if its body constructs a component
    pub fn from_function(front_end: &dyn FrontEnd, function: NodeId) -> Option<Self> {
        let tree = front_end.tree();
        let NodeKind::Function {
            receiver: Some(receiver),
            ..
        } = tree.kind(function)
        else {
            return None;
        };
        if !receiver.is_class(&front_end.config().builder_receiver) {
            return None;
        }
        let call = tree.function_body(function)?;
        let expression = BuilderExpression::from_call(front_end, call)?;
        Some(Self {
            component: expression.component,
            function,
        })
    }

    pub fn name<'t>(&self, tree: &'t SyntaxTree) -> Option<&'t str> {
        tree.name(self.function)
    }

    pub fn parameter_list(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.parameter_list(self.function)
    }

    pub fn parameters(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.parameters(self.function)
    }

    /// The construction call the function body consists of
    pub fn expression(&self, tree: &SyntaxTree) -> Option<BuilderExpression> {
        let call = tree.function_body(self.function)?;
        matches!(tree.kind(call), NodeKind::Call).then_some(BuilderExpression {
            component: self.component,
            call,
        })
    }
}

/// Declared fields the construction lambda leaves unassigned on some path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninitializedFields {
    pub fields: Vec<Field>,
    pub children_not_set: bool,
    /// `None` when the lambda could not be analyzed
    pub assignments: Option<FieldAssignmentState>,
}

/// A `child(C::class) { ... }` call constructing a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderExpression {
    pub component: ComponentDeclaration,
    pub call: NodeId,
}

impl BuilderExpression {
    pub fn from_call(front_end: &dyn FrontEnd, call: NodeId) -> Option<Self> {
        let tree = front_end.tree();
        let config = front_end.config();
        if tree.callee_name(call) != Some(config.construction_function.as_str()) {
            return None;
        }
        let literal = *tree.call_arguments(call).first()?;
        if !matches!(tree.kind(literal), NodeKind::ClassLiteral { .. }) {
            return None;
        }
        let class = front_end.resolve(literal)?;
        let component = ComponentDeclaration::from_class(tree, class, config)?;
        Some(Self { component, call })
    }

    pub fn lambda(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.call_lambda(self.call)
    }

    pub fn lambda_body(&self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.lambda_block(self.lambda(tree)?)
    }

    /// Props fields, in declaration order; `None` without a props interface
    pub fn props_fields(&self, front_end: &dyn FrontEnd) -> Option<Vec<Field>> {
        let interface = self.component.find_props_interface(front_end)?;
        Some(analyze(front_end, &interface, None).fields)
    }

    /// Assignment state at the end of the construction lambda
    pub fn field_assignments(&self, front_end: &dyn FrontEnd) -> Option<FieldAssignmentState> {
        let tree = front_end.tree();
        let fields = self.props_fields(front_end)?;
        let lambda = self.lambda(tree)?;
        let props_type = self.component.props_type(tree)?;
        let Some(pseudocode) = front_end.control_flow(lambda) else {
            debug!(call = ?self.call, "construction lambda has no control flow");
            return None;
        };
        let matcher = BuilderWriteMatcher {
            lambda,
            props_type,
            fields: &fields,
        };
        let mut solver = CfgSolver::new(&pseudocode, front_end, matcher);
        Some(solver.solve_sink())
    }

    pub fn collect_missing_fields(&self, front_end: &dyn FrontEnd) -> UninitializedFields {
        let Some(fields) = self.props_fields(front_end) else {
            return UninitializedFields {
                fields: Vec::new(),
                children_not_set: true,
                assignments: None,
            };
        };
        match self.field_assignments(front_end) {
            Some(state) => UninitializedFields {
                fields: fields.into_iter().filter(|f| !state.contains(f)).collect(),
                children_not_set: true,
                assignments: Some(state),
            },
            None => UninitializedFields {
                fields,
                children_not_set: true,
                assignments: None,
            },
        }
    }

    /// Full gap report; a lambda that cannot be analyzed misses every field
    pub fn gap_report(&self, front_end: &dyn FrontEnd) -> Option<GapReport> {
        let fields = self.props_fields(front_end)?;
        let state = self
            .field_assignments(front_end)
            .unwrap_or(FieldAssignmentState::Empty);
        Some(compute_gaps(front_end, &state, &fields))
    }

    /// Builder function whose expression body is this call
    pub fn find_containing_builder_function(&self, front_end: &dyn FrontEnd) -> Option<BuilderFunction> {
        let tree = front_end.tree();
        let parent = tree.parent(self.call)?;
        match tree.kind(parent) {
            NodeKind::Function {
                receiver: Some(receiver),
                ..
            } if receiver.is_class(&front_end.config().builder_receiver)
                && tree.function_body(parent) == Some(self.call) =>
            {
                Some(BuilderFunction {
                    component: self.component,
                    function: parent,
                })
            }
            _ => None,
        }
    }
}
