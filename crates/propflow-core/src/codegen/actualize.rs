//! Builder function synchronization
//!
//! Brings a builder function in line with its props interface: outdated
//! parameter types are rewritten, missing fields get a parameter and an
//! `attrs.f = f` statement in declaration order, assignments to unknown
//! fields are deleted and parameters the construction lambda no longer
//! reads are dropped.

use super::generator::choose_body_parameter_name;
use super::plan::{Anchor, Edit, EditPlan};
use crate::component::BuilderFunction;
use crate::config::AnalysisConfig;
use crate::dataflow::AssignedValue;
use crate::error::CodegenError;
use crate::fields::{analyze, Field};
use crate::frontend::{FrontEnd, SourceFrontEnd};
use crate::gaps::compute_gaps;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// Synchronize `builder` with its component's props; returns the number of edits applied
///
/// Every precondition is checked before the tree is touched, so an error
/// leaves the tree unchanged. An up-to-date builder yields `Ok(0)`.
pub fn actualize(tree: &mut SyntaxTree, builder: &BuilderFunction, config: &AnalysisConfig) -> Result<usize, CodegenError> {
    let plan = plan_actualize(&SourceFrontEnd::new(tree, config), builder)?;
    let planned = plan.len();
    let mut applied = plan.apply(tree)?;
    applied += remove_unused_parameters(tree, builder, config)?;
    debug!(function = ?builder.function, planned, applied, "synchronized builder function");
    Ok(applied)
}

/// Edits that synchronize `builder`, unused parameter removal excluded
pub fn plan_actualize(front_end: &dyn FrontEnd, builder: &BuilderFunction) -> Result<EditPlan, CodegenError> {
    let tree = front_end.tree();
    let config = front_end.config();
    let function = builder.function;
    if !tree.is_attached(function) {
        return Err(CodegenError::DetachedNode(function));
    }
    let list = builder
        .parameter_list(tree)
        .ok_or(CodegenError::MissingParameterList(function))?;
    let expression = builder
        .expression(tree)
        .ok_or(CodegenError::MissingConstructionCall(function))?;
    let lambda = expression
        .lambda(tree)
        .ok_or(CodegenError::MissingLambdaBody(expression.call))?;
    let body = expression
        .lambda_body(tree)
        .ok_or(CodegenError::MissingLambdaBody(expression.call))?;
    let interface = builder
        .component
        .find_props_interface(front_end)
        .ok_or(CodegenError::MissingPropsInterface(builder.component.class))?;
    let fields = analyze(front_end, &interface, None).fields;
    let state = expression
        .field_assignments(front_end)
        .ok_or(CodegenError::MissingControlFlow(lambda))?;
    let gaps = compute_gaps(front_end, &state, &fields);
    let parameters = tree.parameters(function);

    let mut plan = EditPlan::new();

    for outdated in &gaps.outdated_param_fields {
        if let Some(ty) = &outdated.field.declared_type {
            if parameters.contains(&outdated.parameter) {
                plan.push(Edit::ReplaceType {
                    parameter: outdated.parameter,
                    ty: ty.clone(),
                });
            }
        }
    }

    let handler = parameters
        .iter()
        .copied()
        .find(|&p| tree.written_type(p).is_some_and(|ty| ty.is_class(&config.handler_type)));
    if let Some(handler) = handler {
        plan_handler_rename(front_end, handler, body, &fields, &mut plan);
    }

    let mut prev_parameter: Option<Anchor> = None;
    let mut prev_statement: Option<Anchor> = None;
    for field in &fields {
        let Some(name) = field.name.as_deref() else {
            continue;
        };
        match state.get(field) {
            None => {
                let existing = parameters
                    .iter()
                    .copied()
                    .find(|&p| Some(p) != handler && tree.name(p) == Some(name));
                prev_parameter = match existing {
                    Some(parameter) => {
                        let written = front_end.declared_type(parameter);
                        if let (Some(ty), Some(written)) = (&field.declared_type, written) {
                            if &written != ty {
                                plan.push(Edit::ReplaceType {
                                    parameter,
                                    ty: ty.clone(),
                                });
                            }
                        }
                        Some(Anchor::Existing(parameter))
                    }
                    None => plan.push(Edit::InsertParameter {
                        list,
                        after: prev_parameter,
                        name: name.to_string(),
                        ty: field.declared_type.clone(),
                    }),
                };
                prev_statement = plan.push(Edit::InsertStatement {
                    block: body,
                    after: prev_statement,
                    receiver: config.attrs_member.clone(),
                    field: name.to_string(),
                });
            }
            Some(assignment) => {
                if let AssignedValue::Parameter(parameter) = assignment.value {
                    if parameters.contains(&parameter) {
                        prev_parameter = Some(Anchor::Existing(parameter));
                    }
                }
                prev_statement = assignment
                    .anchor
                    .and_then(|anchor| statement_of(tree, body, anchor))
                    .map(Anchor::Existing);
            }
        }
    }

    let unknown: IndexSet<NodeId> = gaps
        .unknown_assignments
        .iter()
        .filter_map(|assignment| assignment.anchor)
        .filter(|&anchor| anchor != body && tree.is_ancestor_or_self(body, anchor))
        .collect();
    for statement in unknown {
        plan.push(Edit::RemoveStatement { statement });
    }

    debug!(
        function = ?function,
        missing = gaps.missing_fields.len(),
        unknown = gaps.unknown_assignments.len(),
        outdated = gaps.outdated_param_fields.len(),
        edits = plan.len(),
        "planned builder synchronization"
    );
    Ok(plan)
}

/// Move the children handler off a name that a props field claims
///
/// The handler and every lambda reference to it get the first free
/// `body`, `body1`.. name, leaving the field name for a fresh parameter.
fn plan_handler_rename(front_end: &dyn FrontEnd, handler: NodeId, body: NodeId, fields: &[Field], plan: &mut EditPlan) {
    let tree = front_end.tree();
    let Some(current) = tree.name(handler) else {
        return;
    };
    if !fields.iter().any(|field| field.name.as_deref() == Some(current)) {
        return;
    }
    let renamed = choose_body_parameter_name(&front_end.config().body_parameter, fields);
    debug!(handler = ?handler, from = current, to = %renamed, "renaming children handler");
    let references: Vec<NodeId> = tree
        .descendants(body)
        .into_iter()
        .filter(|&node| matches!(tree.kind(node), NodeKind::NameRef { .. }))
        .filter(|&node| front_end.resolve(node) == Some(handler))
        .collect();
    for node in std::iter::once(handler).chain(references) {
        plan.push(Edit::Rename {
            node,
            name: renamed.clone(),
        });
    }
}

/// Delete the lambda statements that reference `field`, then drop unused parameters
///
/// Must run while the field declaration is still attached, since references
/// are found by resolving them.
pub fn remove_field(
    tree: &mut SyntaxTree,
    builder: &BuilderFunction,
    field: &Field,
    config: &AnalysisConfig,
) -> Result<usize, CodegenError> {
    let plan = {
        let front_end = SourceFrontEnd::new(tree, config);
        let body = lambda_body(tree, builder)?;
        let mut plan = EditPlan::new();
        for statement in tree.statements(body) {
            let references_field = tree
                .descendants(statement)
                .into_iter()
                .filter(|&node| matches!(tree.kind(node), NodeKind::NameRef { .. }))
                .any(|node| front_end.resolve(node) == Some(field.declaration));
            if references_field {
                plan.push(Edit::RemoveStatement { statement });
            }
        }
        plan
    };
    let removed = plan.apply(tree)?;
    Ok(removed + remove_unused_parameters(tree, builder, config)?)
}

/// Remove builder parameters that nothing in the construction lambda references
pub fn remove_unused_parameters(
    tree: &mut SyntaxTree,
    builder: &BuilderFunction,
    config: &AnalysisConfig,
) -> Result<usize, CodegenError> {
    let plan = plan_unused_parameters(&SourceFrontEnd::new(tree, config), builder)?;
    if !plan.is_empty() {
        debug!(function = ?builder.function, count = plan.len(), "removing unused parameters");
    }
    plan.apply(tree)
}

fn plan_unused_parameters(front_end: &dyn FrontEnd, builder: &BuilderFunction) -> Result<EditPlan, CodegenError> {
    let tree = front_end.tree();
    let body = lambda_body(tree, builder)?;
    let referenced: HashSet<NodeId> = tree
        .descendants(body)
        .into_iter()
        .filter(|&node| matches!(tree.kind(node), NodeKind::NameRef { .. }))
        .filter_map(|node| front_end.resolve(node))
        .collect();

    let mut plan = EditPlan::new();
    for parameter in builder.parameters(tree) {
        if !referenced.contains(&parameter) {
            plan.push(Edit::RemoveParameter { parameter });
        }
    }
    Ok(plan)
}

fn lambda_body(tree: &SyntaxTree, builder: &BuilderFunction) -> Result<NodeId, CodegenError> {
    let expression = builder
        .expression(tree)
        .ok_or(CodegenError::MissingConstructionCall(builder.function))?;
    expression
        .lambda_body(tree)
        .ok_or(CodegenError::MissingLambdaBody(expression.call))
}

/// The statement of `body` containing `node`; `None` for the body itself or outside nodes
fn statement_of(tree: &SyntaxTree, body: NodeId, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&candidate| tree.parent(candidate) == Some(body))
}
