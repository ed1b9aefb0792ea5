//! Constructors for detached subtrees
//!
//! Every `new_*` method allocates a fresh node (plus children) that is not
//! yet attached anywhere; callers splice it in with `append_child`,
//! `insert_after` and friends.

use super::tree::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;

impl SyntaxTree {
    pub fn new_name_ref(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::NameRef {
            name: name.to_string(),
        })
    }

    pub fn new_literal(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Literal {
            text: text.to_string(),
        })
    }

    pub fn new_type_ref(&mut self, ty: Type) -> NodeId {
        self.alloc(NodeKind::TypeRef { ty })
    }

    pub fn new_whitespace(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Whitespace {
            text: text.to_string(),
        })
    }

    pub fn new_newline(&mut self) -> NodeId {
        self.new_whitespace("\n")
    }

    pub fn new_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    pub fn new_class_literal(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::ClassLiteral {
            name: name.to_string(),
        })
    }

    pub fn new_dot(&mut self, receiver: NodeId, selector: NodeId) -> NodeId {
        self.alloc_with(NodeKind::DotQualified, &[receiver, selector])
    }

    pub fn new_assign(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.alloc_with(NodeKind::Assign, &[lhs, rhs])
    }

    /// `receiver.field = value`, where `value` is a name reference
    pub fn new_member_assignment(&mut self, receiver: &str, field: &str, value: &str) -> NodeId {
        let receiver = self.new_name_ref(receiver);
        let field = self.new_name_ref(field);
        let lhs = self.new_dot(receiver, field);
        let rhs = self.new_name_ref(value);
        self.new_assign(lhs, rhs)
    }

    pub fn new_block(&mut self, statements: &[NodeId]) -> NodeId {
        self.alloc_with(NodeKind::Block, statements)
    }

    pub fn new_lambda(&mut self, statements: &[NodeId]) -> NodeId {
        let block = self.new_block(statements);
        self.alloc_with(NodeKind::Lambda, &[block])
    }

    pub fn new_call(&mut self, callee: &str, args: &[NodeId], lambda: Option<NodeId>) -> NodeId {
        let callee = self.new_name_ref(callee);
        let call = self.alloc_with(NodeKind::Call, &[callee]);
        for &arg in args {
            self.append_child(call, arg);
        }
        if let Some(lambda) = lambda {
            self.append_child(call, lambda);
        }
        call
    }

    pub fn new_parameter(&mut self, name: &str, ty: Option<Type>, default: Option<&str>) -> NodeId {
        let param = self.alloc(NodeKind::Parameter {
            name: name.to_string(),
            default: default.map(str::to_string),
        });
        if let Some(ty) = ty {
            let type_ref = self.new_type_ref(ty);
            self.append_child(param, type_ref);
        }
        param
    }

    pub fn new_parameter_list(&mut self, params: &[NodeId]) -> NodeId {
        self.alloc_with(NodeKind::ParameterList, params)
    }

    /// Function with a parameter list and a body (block or expression)
    pub fn new_function(
        &mut self,
        name: Option<&str>,
        receiver: Option<Type>,
        params: &[NodeId],
        body: NodeId,
    ) -> NodeId {
        let list = self.new_parameter_list(params);
        self.alloc_with(
            NodeKind::Function {
                name: name.map(str::to_string),
                receiver,
                is_override: false,
            },
            &[list, body],
        )
    }

    pub fn new_property(&mut self, name: &str, ty: Option<Type>, mutable: bool) -> NodeId {
        let prop = self.alloc(NodeKind::Property {
            name: Some(name.to_string()),
            mutable,
            receiver: None,
            synthesized: false,
        });
        if let Some(ty) = ty {
            let type_ref = self.new_type_ref(ty);
            self.append_child(prop, type_ref);
        }
        prop
    }

    pub fn new_interface(&mut self, name: &str, supertypes: Vec<Type>, members: &[NodeId]) -> NodeId {
        self.alloc_with(
            NodeKind::Interface {
                name: name.to_string(),
                supertypes,
            },
            members,
        )
    }

    /// Supertype entry; `call_args` turns it into a constructor call
    pub fn new_super_type_entry(&mut self, ty: Type, call_args: Option<&[NodeId]>) -> NodeId {
        self.alloc_with(
            NodeKind::SuperTypeEntry {
                ty,
                call: call_args.is_some(),
            },
            call_args.unwrap_or(&[]),
        )
    }

    pub fn new_class(
        &mut self,
        name: &str,
        constructor: Option<&[NodeId]>,
        supertypes: &[NodeId],
        members: &[NodeId],
    ) -> NodeId {
        let class = self.alloc(NodeKind::Class {
            name: name.to_string(),
        });
        if let Some(params) = constructor {
            let list = self.new_parameter_list(params);
            self.append_child(class, list);
        }
        for &child in supertypes.iter().chain(members) {
            self.append_child(class, child);
        }
        class
    }

    pub fn new_if(&mut self, condition: NodeId, then_stmts: &[NodeId], else_stmts: Option<&[NodeId]>) -> NodeId {
        let then_block = self.new_block(then_stmts);
        let node = self.alloc_with(NodeKind::If, &[condition, then_block]);
        if let Some(stmts) = else_stmts {
            let else_block = self.new_block(stmts);
            self.append_child(node, else_block);
        }
        node
    }

    pub fn new_while(&mut self, condition: NodeId, body: &[NodeId]) -> NodeId {
        let block = self.new_block(body);
        self.alloc_with(NodeKind::While, &[condition, block])
    }

    pub fn new_return(&mut self, value: Option<NodeId>) -> NodeId {
        self.alloc_with(NodeKind::Return, value.as_slice())
    }

    pub fn new_throw(&mut self, value: NodeId) -> NodeId {
        self.alloc_with(NodeKind::Throw, &[value])
    }

    pub fn new_break(&mut self) -> NodeId {
        self.alloc(NodeKind::Break)
    }

    pub fn new_continue(&mut self) -> NodeId {
        self.alloc(NodeKind::Continue)
    }

    /// Attach a declaration at the end of the file
    pub fn add_top_level(&mut self, decl: NodeId) -> NodeId {
        let root = self.root();
        self.append_child(root, decl);
        decl
    }
}
