//! Field-write pattern matchers
//!
//! A matcher decides whether an instruction is a write into one of the
//! fields under analysis. Two binding patterns exist:
//! - builder lambdas: `attrs.field = value` where `attrs` is read through the
//!   lambda's own element-builder receiver
//! - state initializers: `field = value` through the extension receiver of
//!   the `init` function
//!
//! A write that matches the pattern but names no known field is reported as
//! unknown so codegen can delete it.

use super::cfg::{AccessTarget, Instruction, InstructionKind, Pseudocode, ReceiverValue};
use super::state::{AssignedValue, Assignment};
use crate::fields::Field;
use crate::frontend::FrontEnd;
use crate::syntax::{NodeId, NodeKind};
use crate::types::Type;

/// Result of matching one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedWrite {
    Known(Field, Assignment),
    Unknown(Assignment),
}

/// What a matcher can consult
pub struct MatchContext<'a> {
    pub pseudocode: &'a Pseudocode,
    pub front_end: &'a dyn FrontEnd,
}

pub trait WriteMatcher {
    fn try_match(&self, instruction: &Instruction, ctx: &MatchContext<'_>) -> Option<MatchedWrite>;
}

impl<M: WriteMatcher + ?Sized> WriteMatcher for &M {
    fn try_match(&self, instruction: &Instruction, ctx: &MatchContext<'_>) -> Option<MatchedWrite> {
        (**self).try_match(instruction, ctx)
    }
}

/// Value and anchor of the assignment an instruction was lowered from
///
/// `Parameter(p)` only when the right operand is a bare name resolving to
/// parameter `p`; everything else is `Mixed`.
pub fn classify_write(front_end: &dyn FrontEnd, instruction: &Instruction) -> Assignment {
    let tree = front_end.tree();
    let anchor = instruction
        .element
        .filter(|&e| matches!(tree.kind(e), NodeKind::Assign));
    let value = anchor
        .and_then(|assign| tree.operands(assign))
        .filter(|&(_, rhs)| matches!(tree.kind(rhs), NodeKind::NameRef { .. }))
        .and_then(|(_, rhs)| front_end.resolve(rhs))
        .filter(|&decl| matches!(tree.kind(decl), NodeKind::Parameter { .. }))
        .map_or(AssignedValue::Mixed, AssignedValue::Parameter);
    Assignment::new(value, anchor)
}

fn matched(fields: &[Field], name: Option<&str>, assignment: Assignment) -> MatchedWrite {
    let field = name.and_then(|name| fields.iter().find(|f| f.name.as_deref() == Some(name)));
    match field {
        Some(field) => MatchedWrite::Known(field.clone(), assignment),
        None => MatchedWrite::Unknown(assignment),
    }
}

fn single_receiver_bound_to(receivers: &[ReceiverValue], owner: NodeId) -> Option<&Type> {
    match receivers {
        [ReceiverValue::Extension { bound_to, ty }] if *bound_to == owner => Some(ty),
        _ => None,
    }
}

/// `attrs.field = value` inside one construction lambda
pub struct BuilderWriteMatcher<'f> {
    pub lambda: NodeId,
    pub props_type: Type,
    pub fields: &'f [Field],
}

impl WriteMatcher for BuilderWriteMatcher<'_> {
    fn try_match(&self, instruction: &Instruction, ctx: &MatchContext<'_>) -> Option<MatchedWrite> {
        let InstructionKind::Write { lvalue, .. } = &instruction.kind else {
            return None;
        };
        let tree = ctx.front_end.tree();
        let config = ctx.front_end.config();
        if !matches!(tree.kind(*lvalue), NodeKind::DotQualified) {
            return None;
        }
        let (receiver, selector) = tree.operands(*lvalue)?;

        let read = ctx.pseudocode.value_created_at(receiver)?;
        let InstructionKind::Read {
            target: AccessTarget::Member { owner, name },
            receivers,
        } = &read.kind
        else {
            return None;
        };
        if owner != &config.element_builder || name != &config.attrs_member {
            return None;
        }
        single_receiver_bound_to(receivers, self.lambda)?;
        if ctx.front_end.type_of(receiver).as_ref() != Some(&self.props_type) {
            return None;
        }
        // only `attrs.name = ...` writes a field
        let name = tree.reference_name(selector)?;

        let assignment = classify_write(ctx.front_end, instruction);
        Some(matched(self.fields, Some(name), assignment))
    }
}

/// `field = value` inside the state initializer
pub struct StateInitWriteMatcher<'f> {
    pub function: NodeId,
    pub state_type: Type,
    pub fields: &'f [Field],
}

impl WriteMatcher for StateInitWriteMatcher<'_> {
    fn try_match(&self, instruction: &Instruction, ctx: &MatchContext<'_>) -> Option<MatchedWrite> {
        let InstructionKind::Write { lvalue, receivers, .. } = &instruction.kind else {
            return None;
        };
        let tree = ctx.front_end.tree();
        let name = tree.reference_name(*lvalue)?;
        let ty = single_receiver_bound_to(receivers, self.function)?;
        if ty != &self.state_type {
            return None;
        }

        let assignment = classify_write(ctx.front_end, instruction);
        Some(matched(self.fields, Some(name), assignment))
    }
}
