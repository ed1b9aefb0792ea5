//! Gap analysis: declared fields versus the assignment state at the sink

use crate::dataflow::{AssignedValue, Assignment, FieldAssignmentState};
use crate::fields::Field;
use crate::frontend::FrontEnd;
use crate::syntax::NodeId;
use serde::{Deserialize, Serialize};

/// A field assigned straight from a parameter whose declared type no longer matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedParameter {
    pub field: Field,
    pub parameter: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    /// Declared fields not assigned on every path, in declaration order
    pub missing_fields: Vec<Field>,
    pub unknown_assignments: Vec<Assignment>,
    pub outdated_param_fields: Vec<OutdatedParameter>,
    /// Whether the children handler may be left unforwarded
    ///
    /// Always `true`: forwarding of the trailing `body` handler is not
    /// analyzed, so no children diagnostic is ever derived from it.
    pub children_not_set: bool,
}

impl GapReport {
    pub fn is_up_to_date(&self) -> bool {
        self.missing_fields.is_empty()
            && self.unknown_assignments.is_empty()
            && self.outdated_param_fields.is_empty()
    }
}

/// Fields assigned from a parameter whose declared type differs from the field's
///
/// Both types must be known; an unknown type on either side is not outdated.
pub fn outdated_parameters(front_end: &dyn FrontEnd, state: &FieldAssignmentState) -> Vec<OutdatedParameter> {
    state
        .assigned()
        .filter_map(|(field, assignment)| match assignment.value {
            AssignedValue::Parameter(parameter) => {
                let field_type = field.declared_type.as_ref()?;
                let parameter_type = front_end.declared_type(parameter)?;
                (&parameter_type != field_type).then(|| OutdatedParameter {
                    field: field.clone(),
                    parameter,
                })
            }
            AssignedValue::Mixed => None,
        })
        .collect()
}

pub fn compute_gaps(front_end: &dyn FrontEnd, state: &FieldAssignmentState, fields: &[Field]) -> GapReport {
    GapReport {
        missing_fields: fields.iter().filter(|f| !state.contains(f)).cloned().collect(),
        unknown_assignments: state.unknown_assignments().to_vec(),
        outdated_param_fields: outdated_parameters(front_end, state),
        children_not_set: true,
    }
}
