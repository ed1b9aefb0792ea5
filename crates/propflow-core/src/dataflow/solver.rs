//! Memoized backward solver for the definite-assignment state
//!
//! The state at an instruction is the merge of the states of its live,
//! non-error-exit predecessors (in predecessor order), followed by whatever
//! write the matcher recognizes at the instruction itself. An instruction is
//! memoized as [`FieldAssignmentState::BackEdge`] while its predecessors are
//! being computed, so a cycle back to it contributes nothing to the merge.
//!
//! The walk keeps an explicit frame stack instead of recursing; visit and
//! merge order are the same as the recursive formulation.

use super::cfg::{InstrId, Pseudocode};
use super::matchers::{MatchContext, MatchedWrite, WriteMatcher};
use super::state::{AssignmentsBuilder, FieldAssignmentState};
use crate::frontend::FrontEnd;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Solver over one pseudocode graph; the memo lives as long as the solver
pub struct CfgSolver<'a, M> {
    pseudocode: &'a Pseudocode,
    front_end: &'a dyn FrontEnd,
    matcher: M,
    memo: HashMap<InstrId, FieldAssignmentState>,
}

struct Frame {
    instruction: InstrId,
    next_predecessor: usize,
    builder: AssignmentsBuilder,
}

impl Frame {
    fn new(instruction: InstrId) -> Self {
        Self {
            instruction,
            next_predecessor: 0,
            builder: AssignmentsBuilder::new(),
        }
    }
}

impl<'a, M: WriteMatcher> CfgSolver<'a, M> {
    pub fn new(pseudocode: &'a Pseudocode, front_end: &'a dyn FrontEnd, matcher: M) -> Self {
        Self {
            pseudocode,
            front_end,
            matcher,
            memo: HashMap::new(),
        }
    }

    /// State at the sink: what is assigned on every normally-completing path
    pub fn solve_sink(&mut self) -> FieldAssignmentState {
        debug!(
            owner = ?self.pseudocode.owner(),
            instructions = self.pseudocode.len(),
            "solving field assignments"
        );
        let state = self.solve(Some(self.pseudocode.sink()));
        debug!(
            memoized = self.memo.len(),
            assigned = state.assigned().count(),
            unknown = state.unknown_assignments().len(),
            "solved field assignments"
        );
        state
    }

    pub fn solve(&mut self, instruction: Option<InstrId>) -> FieldAssignmentState {
        let Some(root) = instruction else {
            return FieldAssignmentState::Empty;
        };
        if let Some(state) = self.memo.get(&root) {
            return state.clone();
        }

        let pseudocode = self.pseudocode;
        let front_end = self.front_end;
        let tree = front_end.tree();
        let ctx = MatchContext {
            pseudocode,
            front_end,
        };

        self.memo.insert(root, FieldAssignmentState::BackEdge);
        let mut stack = vec![Frame::new(root)];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let predecessors = &pseudocode.instruction(frame.instruction).predecessors;
            if let Some(&predecessor) = predecessors.get(frame.next_predecessor) {
                frame.next_predecessor += 1;
                let pred = pseudocode.instruction(predecessor);
                if pred.dead || pred.is_error_exit() {
                    continue;
                }
                match self.memo.get(&predecessor) {
                    Some(state) => frame.builder.merge_branch(state, tree),
                    None => {
                        self.memo.insert(predecessor, FieldAssignmentState::BackEdge);
                        stack.push(Frame::new(predecessor));
                    }
                }
                continue;
            }

            let Some(Frame {
                instruction,
                mut builder,
                ..
            }) = stack.pop()
            else {
                break;
            };
            match self.matcher.try_match(pseudocode.instruction(instruction), &ctx) {
                Some(MatchedWrite::Known(field, assignment)) => {
                    trace!(instruction = ?instruction, field = ?field.name, "matched field write");
                    builder.add_initialized_field(field, assignment);
                }
                Some(MatchedWrite::Unknown(assignment)) => {
                    trace!(instruction = ?instruction, "matched unknown write");
                    builder.add_unknown_assignment(assignment);
                }
                None => {}
            }
            let state = builder.build();
            match stack.last_mut() {
                Some(parent) => {
                    parent.builder.merge_branch(&state, tree);
                    self.memo.insert(instruction, state);
                }
                None => {
                    self.memo.insert(instruction, state.clone());
                    return state;
                }
            }
        }
        FieldAssignmentState::Empty
    }

    /// Number of memoized instructions
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}
