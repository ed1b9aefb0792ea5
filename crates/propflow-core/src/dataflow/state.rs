//! Assignment lattice for the definite-assignment analysis
//!
//! The state at an instruction maps each field assigned on *every* path
//! reaching it to the value written. Merging two branches keeps only the
//! fields both assign:
//! - `Parameter(p) ⊓ Parameter(p)` = `Parameter(p)`
//! - anything else meets to `Mixed`
//! - anchors (the syntax node of the write) meet to their nearest common ancestor

use crate::fields::Field;
use crate::syntax::{NodeId, SyntaxTree};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The value a field was assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedValue {
    /// Exactly the value of this parameter declaration
    Parameter(NodeId),
    /// Anything else, including disagreeing branches
    Mixed,
}

impl AssignedValue {
    /// Meet operation (greatest lower bound)
    pub fn meet(self, other: AssignedValue) -> AssignedValue {
        match (self, other) {
            (AssignedValue::Parameter(a), AssignedValue::Parameter(b)) if a == b => self,
            _ => AssignedValue::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub value: AssignedValue,
    /// Syntax node of the write; after a merge, the nearest common ancestor of the writes
    pub anchor: Option<NodeId>,
}

impl Assignment {
    pub fn new(value: AssignedValue, anchor: Option<NodeId>) -> Self {
        Self { value, anchor }
    }

    fn meet(self, other: Assignment, tree: &SyntaxTree) -> Assignment {
        let anchor = match (self.anchor, other.anchor) {
            (Some(a), Some(b)) => tree.nearest_common_ancestor(a, b),
            _ => None,
        };
        Assignment {
            value: self.value.meet(other.value),
            anchor,
        }
    }
}

/// Fields assigned on every path, plus writes the matcher could not attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    pub by_field: IndexMap<Field, Assignment>,
    pub unknown_assignments: Vec<Assignment>,
}

/// Analysis result at one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAssignmentState {
    /// No instruction to analyze
    Empty,
    /// Placeholder for an instruction whose computation is in progress
    BackEdge,
    Computed(Assignments),
}

impl FieldAssignmentState {
    pub fn is_back_edge(&self) -> bool {
        matches!(self, FieldAssignmentState::BackEdge)
    }

    pub fn assignments(&self) -> Option<&Assignments> {
        match self {
            FieldAssignmentState::Computed(assignments) => Some(assignments),
            _ => None,
        }
    }

    pub fn get(&self, field: &Field) -> Option<&Assignment> {
        self.assignments()?.by_field.get(field)
    }

    pub fn contains(&self, field: &Field) -> bool {
        self.get(field).is_some()
    }

    /// Assigned fields in insertion order; empty for the sentinels
    pub fn assigned(&self) -> impl Iterator<Item = (&Field, &Assignment)> {
        self.assignments()
            .into_iter()
            .flat_map(|assignments| assignments.by_field.iter())
    }

    pub fn unknown_assignments(&self) -> &[Assignment] {
        match self {
            FieldAssignmentState::Computed(assignments) => &assignments.unknown_assignments,
            _ => &[],
        }
    }
}

/// Accumulates the state of one instruction from its predecessors
#[derive(Debug, Default)]
pub struct AssignmentsBuilder {
    /// `None` until the first real branch has been merged
    by_field: Option<IndexMap<Field, Assignment>>,
    unknown_assignments: Vec<Assignment>,
}

impl AssignmentsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the state of one predecessor; back edges are skipped
    pub fn merge_branch(&mut self, branch: &FieldAssignmentState, tree: &SyntaxTree) {
        let FieldAssignmentState::Computed(incoming) = branch else {
            return;
        };

        match self.by_field.as_mut() {
            None => self.by_field = Some(incoming.by_field.clone()),
            Some(current) => {
                current.retain(|field, _| incoming.by_field.contains_key(field));
                for (field, assignment) in current.iter_mut() {
                    if let Some(other) = incoming.by_field.get(field) {
                        *assignment = assignment.meet(*other, tree);
                    }
                }
            }
        }
        self.unknown_assignments
            .extend(incoming.unknown_assignments.iter().copied());
    }

    /// Record a write; a later write to the same field replaces the earlier one
    pub fn add_initialized_field(&mut self, field: Field, assignment: Assignment) {
        self.by_field
            .get_or_insert_with(IndexMap::new)
            .insert(field, assignment);
    }

    pub fn add_unknown_assignment(&mut self, assignment: Assignment) {
        self.unknown_assignments.push(assignment);
    }

    pub fn build(self) -> FieldAssignmentState {
        FieldAssignmentState::Computed(Assignments {
            by_field: self.by_field.unwrap_or_default(),
            unknown_assignments: self.unknown_assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: u32) -> Field {
        Field {
            declaration: NodeId(id),
            name: Some(format!("f{id}")),
            declared_type: None,
        }
    }

    fn computed(entries: &[(Field, Assignment)]) -> FieldAssignmentState {
        let mut builder = AssignmentsBuilder::new();
        for (f, a) in entries {
            builder.add_initialized_field(f.clone(), *a);
        }
        builder.build()
    }

    #[test]
    fn test_meet_values() {
        let p = AssignedValue::Parameter(NodeId(1));
        let q = AssignedValue::Parameter(NodeId(2));
        assert_eq!(p.meet(p), p);
        assert_eq!(p.meet(q), AssignedValue::Mixed);
        assert_eq!(p.meet(AssignedValue::Mixed), AssignedValue::Mixed);
    }

    #[test]
    fn test_merge_intersects_and_meets_anchors() {
        let mut tree = SyntaxTree::new("a.kt");
        let a = tree.new_name_ref("a");
        let b = tree.new_name_ref("b");
        let block = tree.new_block(&[a, b]);
        tree.add_top_level(block);

        let p = AssignedValue::Parameter(NodeId(100));
        let left = computed(
            &[(field(1), Assignment::new(p, Some(a))), (field(2), Assignment::new(p, Some(a)))],
        );
        let right = computed(&[(field(1), Assignment::new(AssignedValue::Mixed, Some(b)))]);

        let mut builder = AssignmentsBuilder::new();
        builder.merge_branch(&left, &tree);
        builder.merge_branch(&FieldAssignmentState::BackEdge, &tree);
        builder.merge_branch(&right, &tree);
        let merged = builder.build();

        assert!(!merged.contains(&field(2)));
        let f1 = merged.get(&field(1)).unwrap();
        assert_eq!(f1.value, AssignedValue::Mixed);
        assert_eq!(f1.anchor, Some(block));
    }

    #[test]
    fn test_first_branch_adopted_even_if_empty() {
        let tree = SyntaxTree::new("a.kt");
        let empty = computed(&[]);
        let full = computed(&[(field(1), Assignment::new(AssignedValue::Mixed, None))]);
        let mut builder = AssignmentsBuilder::new();
        builder.merge_branch(&empty, &tree);
        builder.merge_branch(&full, &tree);
        assert!(!builder.build().contains(&field(1)));
    }

    #[test]
    fn test_later_write_overwrites() {
        let mut builder = AssignmentsBuilder::new();
        builder.add_initialized_field(field(1), Assignment::new(AssignedValue::Mixed, None));
        builder.add_initialized_field(
            field(1),
            Assignment::new(AssignedValue::Parameter(NodeId(9)), None),
        );
        let state = builder.build();
        assert_eq!(state.get(&field(1)).unwrap().value, AssignedValue::Parameter(NodeId(9)));
    }

    #[test]
    fn test_sentinels_report_nothing() {
        assert!(FieldAssignmentState::Empty.unknown_assignments().is_empty());
        assert_eq!(FieldAssignmentState::BackEdge.assigned().count(), 0);
        assert!(FieldAssignmentState::BackEdge.is_back_edge());
    }
}
