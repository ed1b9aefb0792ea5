//! Lowering of function and lambda bodies to pseudocode
//!
//! Structured statements only: `if`, `while`, `return`, `throw`, `break`,
//! `continue`. Nested lambdas and local declarations are opaque values and
//! are not lowered into the enclosing graph. Statements after a jump are
//! still emitted, without predecessors, so they come out dead.

use super::SourceFrontEnd;
use crate::dataflow::cfg::{AccessTarget, InstrId, InstructionKind, Pseudocode, Receivers};
use crate::syntax::{NodeId, NodeKind};
use tracing::trace;

/// Builder for constructing pseudocode from a body
pub struct CfgBuilder<'a, 't> {
    front_end: &'a SourceFrontEnd<'t>,
    cfg: Pseudocode,
    enter: InstrId,
    exit: InstrId,
    error_exit: InstrId,
    current: Option<InstrId>,
    loop_stack: Vec<LoopContext>,
}

struct LoopContext {
    continue_target: InstrId,
    break_target: InstrId,
}

impl<'a, 't> CfgBuilder<'a, 't> {
    pub fn new(front_end: &'a SourceFrontEnd<'t>, owner: NodeId) -> Self {
        let mut cfg = Pseudocode::new(owner);
        let enter = cfg.push(InstructionKind::Enter, Some(owner));
        let exit = cfg.push(InstructionKind::Exit { error: false }, Some(owner));
        let error_exit = cfg.push(InstructionKind::Exit { error: true }, Some(owner));
        Self {
            front_end,
            cfg,
            enter,
            exit,
            error_exit,
            current: Some(enter),
            loop_stack: Vec::new(),
        }
    }

    pub fn build(mut self, body: NodeId) -> Pseudocode {
        match self.front_end.tree.kind(body) {
            NodeKind::Block => self.build_block(body),
            _ => {
                self.build_expr(body);
            }
        }
        self.jump_to(self.exit);

        let sink = self.cfg.push(InstructionKind::Sink, None);
        self.cfg.add_edge(self.exit, sink);
        self.cfg.add_edge(self.error_exit, sink);
        self.cfg.finish(self.enter, sink);
        trace!(
            owner = ?self.cfg.owner(),
            instructions = self.cfg.len(),
            "lowered body"
        );
        self.cfg
    }

    fn emit(&mut self, kind: InstructionKind, element: NodeId) -> InstrId {
        let id = self.cfg.push(kind, Some(element));
        if let Some(current) = self.current {
            self.cfg.add_edge(current, id);
        }
        self.current = Some(id);
        id
    }

    /// Link the current instruction to `target`; following code is unreachable
    fn jump_to(&mut self, target: InstrId) {
        if let Some(current) = self.current.take() {
            self.cfg.add_edge(current, target);
        }
    }

    fn build_block(&mut self, block: NodeId) {
        for stmt in self.front_end.tree.statements(block) {
            self.build_stmt(stmt);
        }
    }

    fn build_stmt(&mut self, stmt: NodeId) {
        let tree = self.front_end.tree;
        match tree.kind(stmt) {
            NodeKind::Assign => self.build_assign(stmt),
            NodeKind::If => {
                self.build_if(stmt);
            }
            NodeKind::While => self.build_while(stmt),
            NodeKind::Block => self.build_block(stmt),
            NodeKind::Return => {
                if let Some(&value) = tree.children(stmt).first() {
                    self.build_expr(value);
                }
                self.emit(InstructionKind::Jump, stmt);
                self.jump_to(self.exit);
            }
            NodeKind::Throw => {
                if let Some(&value) = tree.children(stmt).first() {
                    self.build_expr(value);
                }
                self.emit(InstructionKind::Jump, stmt);
                self.jump_to(self.error_exit);
            }
            NodeKind::Break | NodeKind::Continue => {
                self.emit(InstructionKind::Jump, stmt);
                let target = self.loop_stack.last().map(|ctx| match tree.kind(stmt) {
                    NodeKind::Break => ctx.break_target,
                    _ => ctx.continue_target,
                });
                match target {
                    Some(target) => self.jump_to(target),
                    None => self.current = None,
                }
            }
            NodeKind::Whitespace { .. } | NodeKind::Comment { .. } => {}
            NodeKind::Function { .. } | NodeKind::Class { .. } | NodeKind::Property { .. } => {
                // Local declarations don't affect the enclosing flow
                self.emit(InstructionKind::Eval, stmt);
            }
            _ => {
                self.build_expr(stmt);
            }
        }
    }

    fn build_expr(&mut self, expr: NodeId) -> InstrId {
        let tree = self.front_end.tree;
        let id = match tree.kind(expr) {
            NodeKind::NameRef { .. } => {
                let (target, receivers) = self.front_end.access(expr);
                self.emit(InstructionKind::Read { target, receivers }, expr)
            }
            NodeKind::DotQualified => match tree.operands(expr) {
                Some((receiver, selector)) => {
                    self.build_expr(receiver);
                    let target = self.front_end.selector_target(selector);
                    let id = self.emit(
                        InstructionKind::Read {
                            target,
                            receivers: Receivers::new(),
                        },
                        expr,
                    );
                    self.cfg.record_value(selector, id);
                    id
                }
                None => self.emit(InstructionKind::Eval, expr),
            },
            NodeKind::Call => {
                for arg in tree.call_arguments(expr) {
                    self.build_expr(arg);
                }
                if let Some(lambda) = tree.call_lambda(expr) {
                    self.build_expr(lambda);
                }
                self.emit(InstructionKind::Call, expr)
            }
            NodeKind::If => self.build_if(expr),
            NodeKind::Assign => {
                self.build_assign(expr);
                self.emit(InstructionKind::Eval, expr)
            }
            _ => self.emit(InstructionKind::Eval, expr),
        };
        self.cfg.record_value(expr, id);
        id
    }

    fn build_assign(&mut self, assign: NodeId) {
        let tree = self.front_end.tree;
        let Some((lhs, rhs)) = tree.operands(assign) else {
            self.emit(InstructionKind::Eval, assign);
            return;
        };

        let (target, receivers) = match tree.kind(lhs) {
            NodeKind::DotQualified => match tree.operands(lhs) {
                Some((receiver, selector)) => {
                    self.build_expr(receiver);
                    (self.front_end.selector_target(selector), Receivers::new())
                }
                None => (AccessTarget::Unresolved, Receivers::new()),
            },
            NodeKind::NameRef { .. } => self.front_end.access(lhs),
            _ => {
                self.build_expr(lhs);
                (AccessTarget::Unresolved, Receivers::new())
            }
        };
        self.build_expr(rhs);
        self.emit(
            InstructionKind::Write {
                lvalue: lhs,
                target,
                receivers,
            },
            assign,
        );
    }

    fn build_if(&mut self, node: NodeId) -> InstrId {
        let tree = self.front_end.tree;
        let children = tree.children(node);
        if let Some(&condition) = children.first() {
            self.build_expr(condition);
        }
        let branch_point = self.current;

        if let Some(&then_block) = children.get(1) {
            self.build_stmt(then_block);
        }
        let then_end = self.current.take();

        self.current = branch_point;
        if let Some(&else_block) = children.get(2) {
            self.build_stmt(else_block);
        }
        let else_end = self.current.take();

        let merge = self.cfg.push(InstructionKind::Jump, Some(node));
        for end in [then_end, else_end].into_iter().flatten() {
            self.cfg.add_edge(end, merge);
        }
        self.current = Some(merge);
        merge
    }

    fn build_while(&mut self, node: NodeId) {
        let tree = self.front_end.tree;
        let children = tree.children(node);

        let header = self.cfg.push(InstructionKind::Jump, Some(node));
        self.jump_to(header);
        self.current = Some(header);
        if let Some(&condition) = children.first() {
            self.build_expr(condition);
        }

        let exit = self.cfg.push(InstructionKind::Jump, Some(node));
        if let Some(condition_end) = self.current {
            self.cfg.add_edge(condition_end, exit);
        }

        self.loop_stack.push(LoopContext {
            continue_target: header,
            break_target: exit,
        });
        if let Some(&body) = children.get(1) {
            self.build_stmt(body);
        }
        // Back edge to header
        self.jump_to(header);
        self.loop_stack.pop();

        self.current = Some(exit);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AnalysisConfig;
    use crate::dataflow::cfg::InstructionKind;
    use crate::frontend::{FrontEnd, SourceFrontEnd};
    use crate::syntax::{NodeId, SyntaxTree};
    use crate::types::Type;

    fn function_with(tree: &mut SyntaxTree, stmts: &[NodeId]) -> NodeId {
        let body = tree.new_block(stmts);
        let f = tree.new_function(Some("f"), None, &[], body);
        tree.add_top_level(f)
    }

    #[test]
    fn test_straight_line() {
        let mut tree = SyntaxTree::new("a.kt");
        let one = tree.new_literal("1");
        let call = tree.new_call("g", &[one], None);
        let f = function_with(&mut tree, &[call]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let cfg = fe.control_flow(f).unwrap();

        let sink = cfg.instruction(cfg.sink());
        assert_eq!(sink.kind, InstructionKind::Sink);
        assert!(cfg.instructions().iter().filter(|i| !i.is_error_exit()).all(|i| !i.dead));
        assert_eq!(cfg.value_created_at(call).unwrap().kind, InstructionKind::Call);
    }

    #[test]
    fn test_code_after_return_is_dead() {
        let mut tree = SyntaxTree::new("a.kt");
        let ret = tree.new_return(None);
        let after = tree.new_literal("2");
        let f = function_with(&mut tree, &[ret, after]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let cfg = fe.control_flow(f).unwrap();

        let after_instr = cfg.value_created_at(after).unwrap();
        assert!(after_instr.dead);
        assert!(after_instr.predecessors.is_empty());
    }

    #[test]
    fn test_throw_reaches_error_exit() {
        let mut tree = SyntaxTree::new("a.kt");
        let cond = tree.new_name_ref("c");
        let err = tree.new_call("IllegalStateException", &[], None);
        let throw = tree.new_throw(err);
        let branch = tree.new_if(cond, &[throw], None);
        let f = function_with(&mut tree, &[branch]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let cfg = fe.control_flow(f).unwrap();

        let error_exit = cfg.instructions().iter().find(|i| i.is_error_exit()).unwrap();
        assert!(!error_exit.dead);
        assert_eq!(error_exit.predecessors.len(), 1);
    }

    #[test]
    fn test_while_has_back_edge() {
        let mut tree = SyntaxTree::new("a.kt");
        let cond = tree.new_name_ref("c");
        let step = tree.new_call("g", &[], None);
        let loop_ = tree.new_while(cond, &[step]);
        let f = function_with(&mut tree, &[loop_]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let cfg = fe.control_flow(f).unwrap();

        let header = cfg
            .instructions()
            .iter()
            .find(|i| i.element == Some(loop_) && i.kind == InstructionKind::Jump)
            .unwrap();
        assert_eq!(header.predecessors.len(), 2);
        let step_instr = cfg.value_created_at(step).unwrap().id;
        assert!(header.predecessors.contains(&step_instr));
    }

    #[test]
    fn test_lambda_body_lowered_with_receiver_write() {
        let mut tree = SyntaxTree::new("a.kt");
        let base = Type::generic("RComponent", vec![Type::simple("FooProps"), Type::simple("RState")]);
        let entry = tree.new_super_type_entry(base, None);
        let class = tree.new_class("Foo", None, &[entry], &[]);
        tree.add_top_level(class);
        let assign = tree.new_member_assignment("attrs", "x", "x");
        let lambda = tree.new_lambda(&[assign]);
        let lit = tree.new_class_literal("Foo");
        let call = tree.new_call("child", &[lit], Some(lambda));
        let body = tree.new_block(&[call]);
        let f = tree.new_function(Some("foo"), Some(Type::simple("RBuilder")), &[], body);
        tree.add_top_level(f);

        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let outer = fe.control_flow(f).unwrap();
        assert!(outer
            .instructions()
            .iter()
            .all(|i| !matches!(i.kind, InstructionKind::Write { .. })));

        let inner = fe.control_flow(lambda).unwrap();
        let write = inner
            .instructions()
            .iter()
            .find(|i| matches!(i.kind, InstructionKind::Write { .. }))
            .unwrap();
        assert_eq!(write.element, Some(assign));
    }
}
