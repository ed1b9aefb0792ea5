//! Definite-assignment dataflow over instruction-level control flow

pub mod cfg;
pub mod matchers;
pub mod solver;
pub mod state;

pub use cfg::{AccessTarget, InstrId, Instruction, InstructionKind, Pseudocode, ReceiverValue};
pub use matchers::{
    classify_write, BuilderWriteMatcher, MatchContext, MatchedWrite, StateInitWriteMatcher, WriteMatcher,
};
pub use solver::CfgSolver;
pub use state::{AssignedValue, Assignment, Assignments, AssignmentsBuilder, FieldAssignmentState};
