//! Name resolution and expression typing for the reference front-end
//!
//! Names resolve lexically first (function parameters, then top-level
//! declarations). A name with no lexical binding resolves through the
//! implicit receivers in scope, innermost first: the element builder of a
//! construction lambda, or the extension receiver of a function.

use super::SourceFrontEnd;
use crate::component::ComponentDeclaration;
use crate::dataflow::cfg::{AccessTarget, ReceiverValue, Receivers};
use crate::syntax::{NodeId, NodeKind};
use crate::types::Type;
use smallvec::smallvec;
use std::collections::HashSet;

/// How a bare name was bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Local(NodeId),
    Implicit {
        receiver: ReceiverValue,
        target: AccessTarget,
    },
    Unresolved,
}

impl SourceFrontEnd<'_> {
    pub(crate) fn resolve_name(&self, name_ref: NodeId) -> Resolution {
        let Some(name) = self.tree.reference_name(name_ref) else {
            return Resolution::Unresolved;
        };
        if let Some(decl) = self.lexical_lookup(name_ref, name) {
            return Resolution::Local(decl);
        }

        let receivers = self.implicit_receivers(name_ref);
        for receiver in &receivers {
            let ReceiverValue::Extension { ty, .. } = receiver;
            let target = self.member_target(ty, name);
            if target != AccessTarget::Unresolved {
                return Resolution::Implicit {
                    receiver: receiver.clone(),
                    target,
                };
            }
        }
        match receivers.into_iter().next() {
            Some(receiver) => Resolution::Implicit {
                receiver,
                target: AccessTarget::Unresolved,
            },
            None => Resolution::Unresolved,
        }
    }

    /// Access target and implicit receivers of a bare name
    pub(crate) fn access(&self, name_ref: NodeId) -> (AccessTarget, Receivers) {
        match self.resolve_name(name_ref) {
            Resolution::Local(decl) => (AccessTarget::Declared(decl), Receivers::new()),
            Resolution::Implicit { receiver, target } => (target, smallvec![receiver]),
            Resolution::Unresolved => (AccessTarget::Unresolved, Receivers::new()),
        }
    }

    /// Access target of the selector of a qualified expression
    pub(crate) fn selector_target(&self, selector: NodeId) -> AccessTarget {
        match self.resolve_reference(selector) {
            Some(decl) => AccessTarget::Declared(decl),
            None => AccessTarget::Unresolved,
        }
    }

    pub(crate) fn resolve_reference(&self, name_ref: NodeId) -> Option<NodeId> {
        if let Some(receiver) = self.qualifier_of(name_ref) {
            let owner = self.expression_type(receiver)?;
            let name = self.tree.reference_name(name_ref)?;
            return self.member_declaration(&owner, name);
        }
        match self.resolve_name(name_ref) {
            Resolution::Local(decl) => Some(decl),
            Resolution::Implicit {
                target: AccessTarget::Declared(decl),
                ..
            } => Some(decl),
            _ => None,
        }
    }

    pub(crate) fn expression_type(&self, expression: NodeId) -> Option<Type> {
        let tree = self.tree;
        match tree.kind(expression) {
            NodeKind::NameRef { .. } if self.qualifier_of(expression).is_some() => {
                let decl = self.resolve_reference(expression)?;
                self.declared_type_of(decl)
            }
            NodeKind::NameRef { .. } => match self.resolve_name(expression) {
                Resolution::Local(decl) => self.declared_type_of(decl),
                Resolution::Implicit {
                    receiver: ReceiverValue::Extension { ty, .. },
                    target: AccessTarget::Member { owner, name },
                } if owner == self.config.element_builder && name == self.config.attrs_member => {
                    ty.arg(0).cloned()
                }
                Resolution::Implicit {
                    target: AccessTarget::Declared(decl),
                    ..
                } => self.declared_type_of(decl),
                _ => None,
            },
            NodeKind::DotQualified => {
                let (_, selector) = tree.operands(expression)?;
                self.expression_type(selector)
            }
            NodeKind::Literal { text } => literal_type(text),
            NodeKind::ClassLiteral { name } => {
                Some(Type::generic("KClass", vec![Type::simple(name.clone())]))
            }
            _ => None,
        }
    }

    pub(crate) fn declared_type_of(&self, decl: NodeId) -> Option<Type> {
        match self.tree.kind(decl) {
            NodeKind::Parameter { .. } | NodeKind::Property { .. } => self.tree.written_type(decl).cloned(),
            NodeKind::Interface { name, .. } | NodeKind::Class { name } => Some(Type::simple(name.clone())),
            _ => None,
        }
    }

    /// Receiver expression when `name_ref` is the selector of `receiver.name`
    fn qualifier_of(&self, name_ref: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent(name_ref)?;
        match self.tree.operands(parent) {
            Some((receiver, selector))
                if selector == name_ref && matches!(self.tree.kind(parent), NodeKind::DotQualified) =>
            {
                Some(receiver)
            }
            _ => None,
        }
    }

    fn lexical_lookup(&self, from: NodeId, name: &str) -> Option<NodeId> {
        for scope in self.tree.ancestors(from) {
            match self.tree.kind(scope) {
                NodeKind::Function { .. } => {
                    let param = self
                        .tree
                        .parameters(scope)
                        .into_iter()
                        .find(|&p| self.tree.name(p) == Some(name));
                    if param.is_some() {
                        return param;
                    }
                }
                NodeKind::File { .. } => {
                    return self.tree.find_top_level(name, |k| {
                        matches!(
                            k,
                            NodeKind::Interface { .. } | NodeKind::Class { .. } | NodeKind::Function { .. }
                        )
                    });
                }
                _ => {}
            }
        }
        None
    }

    /// Implicit receivers in scope at `node`, innermost first
    pub(crate) fn implicit_receivers(&self, node: NodeId) -> Vec<ReceiverValue> {
        let mut receivers = Vec::new();
        for scope in self.tree.ancestors(node) {
            match self.tree.kind(scope) {
                NodeKind::Lambda => {
                    if let Some(ty) = self.construction_lambda_receiver(scope) {
                        receivers.push(ReceiverValue::Extension { bound_to: scope, ty });
                    }
                }
                NodeKind::Function {
                    receiver: Some(ty), ..
                } => {
                    receivers.push(ReceiverValue::Extension {
                        bound_to: scope,
                        ty: ty.clone(),
                    });
                }
                _ => {}
            }
        }
        receivers
    }

    /// `RElementBuilder<P>` for the trailing lambda of `child(C::class) { ... }`
    fn construction_lambda_receiver(&self, lambda: NodeId) -> Option<Type> {
        let call = self.tree.parent(lambda)?;
        if self.tree.call_lambda(call) != Some(lambda)
            || self.tree.callee_name(call) != Some(self.config.construction_function.as_str())
        {
            return None;
        }
        let props = self
            .tree
            .call_arguments(call)
            .first()
            .and_then(|&arg| match self.tree.kind(arg) {
                NodeKind::ClassLiteral { name } => self
                    .tree
                    .find_top_level(name, |k| matches!(k, NodeKind::Class { .. })),
                _ => None,
            })
            .and_then(|class| ComponentDeclaration::from_class(self.tree, class, self.config))
            .and_then(|component| component.props_type(self.tree));
        Some(Type::generic(
            self.config.element_builder.clone(),
            props.into_iter().collect(),
        ))
    }

    fn member_target(&self, owner: &Type, name: &str) -> AccessTarget {
        if owner.is_class(&self.config.element_builder) && name == self.config.attrs_member {
            return AccessTarget::Member {
                owner: self.config.element_builder.clone(),
                name: name.to_string(),
            };
        }
        match self.member_declaration(owner, name) {
            Some(decl) => AccessTarget::Declared(decl),
            None => AccessTarget::Unresolved,
        }
    }

    /// Property `name` declared on the interface or class named by `owner`, or its supertypes
    fn member_declaration(&self, owner: &Type, name: &str) -> Option<NodeId> {
        let mut visited = HashSet::new();
        let mut pending = vec![owner.clone()];
        while let Some(ty) = pending.pop() {
            let Some(decl) = self.tree.find_top_level(ty.simple_name(), |k| {
                matches!(k, NodeKind::Interface { .. } | NodeKind::Class { .. })
            }) else {
                continue;
            };
            if !visited.insert(decl) {
                continue;
            }
            let member = self.tree.members(decl).into_iter().find(|&m| {
                matches!(self.tree.kind(m), NodeKind::Property { .. }) && self.tree.name(m) == Some(name)
            });
            if member.is_some() {
                return member;
            }
            if let NodeKind::Interface { supertypes, .. } = self.tree.kind(decl) {
                pending.extend(supertypes.iter().cloned());
            }
        }
        None
    }
}

fn literal_type(text: &str) -> Option<Type> {
    let name = if text.starts_with('"') {
        "String"
    } else if text == "true" || text == "false" {
        "Boolean"
    } else if text.parse::<i64>().is_ok() {
        "Int"
    } else if text.parse::<f64>().is_ok() {
        "Double"
    } else {
        return None;
    };
    Some(Type::simple(name))
}
