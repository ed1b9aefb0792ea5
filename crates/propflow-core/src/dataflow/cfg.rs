//! Instruction-level control flow graph ("pseudocode")
//!
//! One instruction per evaluation step, linked by predecessor/successor
//! edges. Every graph has a single `Enter`, a normal and an error `Exit`,
//! and a `Sink` that both exits flow into. Instructions unreachable from
//! `Enter` are flagged `dead` when the graph is finished.

use crate::syntax::NodeId;
use crate::types::Type;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Unique identifier for an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrId(pub u32);

impl InstrId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a read or write accesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessTarget {
    /// A declaration in the tree (parameter, property)
    Declared(NodeId),
    /// A member of a library type, e.g. `RElementBuilder.attrs`
    Member { owner: String, name: String },
    Unresolved,
}

/// Implicit receiver an access was resolved through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverValue {
    /// Extension receiver of a function or lambda
    Extension { bound_to: NodeId, ty: Type },
}

pub type Receivers = SmallVec<[ReceiverValue; 1]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    Enter,
    Read { target: AccessTarget, receivers: Receivers },
    /// Store into `lvalue`, the left operand of the element `Assign`
    Write {
        lvalue: NodeId,
        target: AccessTarget,
        receivers: Receivers,
    },
    Call,
    Eval,
    /// Merge or jump point
    Jump,
    Exit { error: bool },
    Sink,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub id: InstrId,
    pub kind: InstructionKind,
    /// Syntax element the instruction was lowered from
    pub element: Option<NodeId>,
    pub predecessors: SmallVec<[InstrId; 2]>,
    pub successors: SmallVec<[InstrId; 2]>,
    pub dead: bool,
}

impl Instruction {
    pub fn is_error_exit(&self) -> bool {
        matches!(self.kind, InstructionKind::Exit { error: true })
    }
}

/// Control flow of one function or lambda body
#[derive(Debug, Clone)]
pub struct Pseudocode {
    owner: NodeId,
    instructions: Vec<Instruction>,
    enter: InstrId,
    sink: InstrId,
    values: HashMap<NodeId, InstrId>,
}

impl Pseudocode {
    /// Empty graph; `enter` and `sink` are fixed up by [`Pseudocode::finish`]
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            instructions: Vec::new(),
            enter: InstrId(0),
            sink: InstrId(0),
            values: HashMap::new(),
        }
    }

    pub fn push(&mut self, kind: InstructionKind, element: Option<NodeId>) -> InstrId {
        let id = InstrId(self.instructions.len() as u32);
        self.instructions.push(Instruction {
            id,
            kind,
            element,
            predecessors: SmallVec::new(),
            successors: SmallVec::new(),
            dead: false,
        });
        id
    }

    pub fn add_edge(&mut self, from: InstrId, to: InstrId) {
        let succs = &mut self.instructions[from.index()].successors;
        if !succs.contains(&to) {
            succs.push(to);
        }
        let preds = &mut self.instructions[to.index()].predecessors;
        if !preds.contains(&from) {
            preds.push(from);
        }
    }

    /// Record that `instruction` produces the value of expression `node`
    pub fn record_value(&mut self, node: NodeId, instruction: InstrId) {
        self.values.insert(node, instruction);
    }

    /// Fix the entry and sink and compute dead flags by forward reachability
    pub fn finish(&mut self, enter: InstrId, sink: InstrId) {
        self.enter = enter;
        self.sink = sink;
        let mut live = vec![false; self.instructions.len()];
        let mut stack = vec![enter];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut live[id.index()], true) {
                continue;
            }
            stack.extend(self.instructions[id.index()].successors.iter().copied());
        }
        for (instruction, live) in self.instructions.iter_mut().zip(live) {
            instruction.dead = !live;
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn enter(&self) -> InstrId {
        self.enter
    }

    pub fn sink(&self) -> InstrId {
        self.sink
    }

    pub fn instruction(&self, id: InstrId) -> &Instruction {
        &self.instructions[id.index()]
    }

    pub fn get(&self, id: InstrId) -> Option<&Instruction> {
        self.instructions.get(id.index())
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction that created the value of expression `node`
    pub fn value_created_at(&self, node: NodeId) -> Option<&Instruction> {
        self.values.get(&node).map(|&id| self.instruction(id))
    }
}
