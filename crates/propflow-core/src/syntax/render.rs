//! Kotlin-flavoured source rendering
//!
//! Used for diagnostics, tests and snapshots. Statements in a block go on
//! their own line; a whitespace node holding two or more newlines becomes a
//! blank line, other whitespace is dropped.

use super::tree::{NodeId, NodeKind, SyntaxTree};

const INDENT: &str = "    ";

/// Render the whole file
pub fn render(tree: &SyntaxTree) -> String {
    render_node(tree, tree.root())
}

/// Render a single subtree
pub fn render_node(tree: &SyntaxTree, node: NodeId) -> String {
    let mut renderer = Renderer {
        tree,
        out: String::new(),
        depth: 0,
    };
    renderer.node(node);
    renderer.out
}

struct Renderer<'t> {
    tree: &'t SyntaxTree,
    out: String,
    depth: usize,
}

impl Renderer<'_> {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn node(&mut self, id: NodeId) {
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::File { .. } => {
                let decls: Vec<_> = tree.significant_children(id).collect();
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        self.push("\n\n");
                    }
                    self.node(*decl);
                }
                if !decls.is_empty() {
                    self.push("\n");
                }
            }
            NodeKind::Interface { name, supertypes } => {
                self.push(&format!("interface {name}"));
                if !supertypes.is_empty() {
                    let list: Vec<_> = supertypes.iter().map(ToString::to_string).collect();
                    self.push(&format!(" : {}", list.join(", ")));
                }
                self.members(&tree.children(id).to_vec());
            }
            NodeKind::Property {
                name,
                mutable,
                receiver,
                ..
            } => {
                self.push(if *mutable { "var " } else { "val " });
                if let Some(receiver) = receiver {
                    self.push(&format!("{receiver}."));
                }
                self.push(name.as_deref().unwrap_or("<anonymous>"));
                if let Some(ty) = tree.written_type(id) {
                    self.push(&format!(": {ty}"));
                }
            }
            NodeKind::MemberFunction { name } => self.push(&format!("fun {name}()")),
            NodeKind::Class { name } => {
                self.push(&format!("class {name}"));
                if let Some(list) = tree.parameter_list(id) {
                    self.node(list);
                }
                let supers = tree.super_type_entries(id);
                for (i, entry) in supers.iter().enumerate() {
                    self.push(if i == 0 { " : " } else { ", " });
                    self.node(*entry);
                }
                self.members(&tree.members(id));
            }
            NodeKind::SuperTypeEntry { ty, call } => {
                self.push(&ty.to_string());
                if *call {
                    self.arguments(&tree.children(id).to_vec());
                }
            }
            NodeKind::Function {
                name,
                receiver,
                is_override,
            } => {
                if *is_override {
                    self.push("override ");
                }
                self.push("fun ");
                if let Some(receiver) = receiver {
                    self.push(&format!("{receiver}."));
                }
                self.push(name.as_deref().unwrap_or(""));
                match tree.parameter_list(id) {
                    Some(list) => self.node(list),
                    None => self.push("()"),
                }
                if let Some(body) = tree.function_body(id) {
                    if matches!(tree.kind(body), NodeKind::Block) {
                        self.push(" ");
                        self.braced_block(body);
                    } else {
                        self.push(" = ");
                        self.node(body);
                    }
                }
            }
            NodeKind::ParameterList => {
                let params: Vec<_> = tree.significant_children(id).collect();
                self.push("(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.node(*param);
                }
                self.push(")");
            }
            NodeKind::Parameter { name, default } => {
                self.push(name);
                if let Some(ty) = tree.written_type(id) {
                    self.push(&format!(": {ty}"));
                }
                if let Some(default) = default {
                    self.push(&format!(" = {default}"));
                }
            }
            NodeKind::TypeRef { ty } => self.push(&ty.to_string()),
            NodeKind::Block => self.braced_block(id),
            NodeKind::Lambda => match tree.lambda_block(id) {
                Some(block) => self.braced_block(block),
                None => self.push("{}"),
            },
            NodeKind::Call => {
                if let Some(callee) = tree.call_callee(id) {
                    self.node(callee);
                }
                let args = tree.call_arguments(id);
                let lambda = tree.call_lambda(id);
                if !args.is_empty() || lambda.is_none() {
                    self.arguments(&args);
                }
                if let Some(lambda) = lambda {
                    self.push(" ");
                    self.node(lambda);
                }
            }
            NodeKind::ClassLiteral { name } => self.push(&format!("{name}::class")),
            NodeKind::Assign => {
                if let Some((lhs, rhs)) = tree.operands(id) {
                    self.node(lhs);
                    self.push(" = ");
                    self.node(rhs);
                }
            }
            NodeKind::DotQualified => {
                if let Some((receiver, selector)) = tree.operands(id) {
                    self.node(receiver);
                    self.push(".");
                    self.node(selector);
                }
            }
            NodeKind::NameRef { name } => self.push(name),
            NodeKind::Literal { text } => self.push(text),
            NodeKind::If => {
                let children = tree.children(id).to_vec();
                self.push("if (");
                if let Some(cond) = children.first() {
                    self.node(*cond);
                }
                self.push(") ");
                if let Some(then_block) = children.get(1) {
                    self.braced_block(*then_block);
                }
                if let Some(else_block) = children.get(2) {
                    self.push(" else ");
                    self.braced_block(*else_block);
                }
            }
            NodeKind::While => {
                let children = tree.children(id).to_vec();
                self.push("while (");
                if let Some(cond) = children.first() {
                    self.node(*cond);
                }
                self.push(") ");
                if let Some(body) = children.get(1) {
                    self.braced_block(*body);
                }
            }
            NodeKind::Return => {
                self.push("return");
                if let Some(value) = tree.children(id).first() {
                    self.push(" ");
                    self.node(*value);
                }
            }
            NodeKind::Throw => {
                self.push("throw");
                if let Some(value) = tree.children(id).first() {
                    self.push(" ");
                    self.node(*value);
                }
            }
            NodeKind::Break => self.push("break"),
            NodeKind::Continue => self.push("continue"),
            NodeKind::Whitespace { .. } => {}
            NodeKind::Comment { text } => self.push(&format!("// {text}")),
        }
    }

    fn arguments(&mut self, args: &[NodeId]) {
        self.push("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.node(*arg);
        }
        self.push(")");
    }

    fn members(&mut self, members: &[NodeId]) {
        let members: Vec<_> = members
            .iter()
            .copied()
            .filter(|&m| !self.tree.kind(m).is_trivia())
            .collect();
        if members.is_empty() {
            return;
        }
        self.push(" {");
        self.depth += 1;
        for member in members {
            self.newline();
            self.node(member);
        }
        self.depth -= 1;
        self.newline();
        self.push("}");
    }

    fn braced_block(&mut self, block: NodeId) {
        let tree = self.tree;
        let children = tree.children(block).to_vec();
        if tree.statements(block).is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.depth += 1;
        for child in children {
            match tree.kind(child) {
                NodeKind::Whitespace { text } => {
                    if text.matches('\n').count() >= 2 {
                        self.out.push('\n');
                    }
                }
                _ => {
                    self.newline();
                    self.node(child);
                }
            }
        }
        self.depth -= 1;
        self.newline();
        self.push("}");
    }
}
