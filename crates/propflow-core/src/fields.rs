//! Field registry: which members of a props/state interface are fields
//!
//! A field interface is an interface extending the framework's props or
//! state base type. Only mutable, non-extension properties qualify as
//! fields; everything else callable is rejected with a diagnostic when a
//! sink is supplied, and silently dropped otherwise.

use crate::config::AnalysisConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, FixAction, Severity};
use crate::frontend::FrontEnd;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use tracing::debug;

/// A declared field; identity is the declaration node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub declaration: NodeId,
    pub name: Option<String>,
    pub declared_type: Option<Type>,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaration.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceKind {
    Props,
    State,
}

impl InterfaceKind {
    pub fn title(self) -> &'static str {
        match self {
            InterfaceKind::Props => "RProps",
            InterfaceKind::State => "RState",
        }
    }

    /// Suffix of the conventional interface name, `{Component}{Suffix}`
    pub fn suffix(self) -> &'static str {
        match self {
            InterfaceKind::Props => "Props",
            InterfaceKind::State => "State",
        }
    }

    /// Relative position in a file: props, then state, then the component
    pub fn order_in_file(self) -> u8 {
        match self {
            InterfaceKind::Props => 1,
            InterfaceKind::State => 2,
        }
    }

    /// Index of the type argument on the component base type
    pub fn type_argument_index(self) -> usize {
        match self {
            InterfaceKind::Props => 0,
            InterfaceKind::State => 1,
        }
    }

    pub fn base_type(self, config: &AnalysisConfig) -> &str {
        match self {
            InterfaceKind::Props => &config.props_base,
            InterfaceKind::State => &config.state_base,
        }
    }

    /// Kind of an interface declaration, judged by its direct supertypes
    pub fn of(tree: &SyntaxTree, interface: NodeId, config: &AnalysisConfig) -> Option<Self> {
        let NodeKind::Interface { supertypes, .. } = tree.kind(interface) else {
            return None;
        };
        [InterfaceKind::Props, InterfaceKind::State]
            .into_iter()
            .find(|kind| supertypes.iter().any(|s| s.is_class(kind.base_type(config))))
    }
}

/// An interface declaration known to be a props or state interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInterface {
    pub declaration: NodeId,
    pub kind: InterfaceKind,
}

impl FieldInterface {
    pub fn new(tree: &SyntaxTree, declaration: NodeId, config: &AnalysisConfig) -> Option<Self> {
        InterfaceKind::of(tree, declaration, config).map(|kind| Self { declaration, kind })
    }

    pub fn name<'t>(&self, tree: &'t SyntaxTree) -> Option<&'t str> {
        tree.name(self.declaration)
    }
}

/// Accepted fields of an interface, in declaration order
#[derive(Debug, Clone)]
pub struct AnalyzedInterface {
    pub interface: FieldInterface,
    pub fields: Vec<Field>,
}

impl AnalyzedInterface {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.as_deref() == Some(name))
    }
}

/// Collect the fields of `interface`, reporting rejected members to `sink`
pub fn analyze(
    front_end: &dyn FrontEnd,
    interface: &FieldInterface,
    mut sink: Option<&mut dyn DiagnosticSink>,
) -> AnalyzedInterface {
    let tree = front_end.tree();
    let config = front_end.config();
    let kind = interface.kind;
    let only_var = format!("Only var properties are allowed in {} interfaces", kind.title());
    let mut fields = Vec::new();

    for member in tree.members(interface.declaration) {
        let rejection = match tree.kind(member) {
            NodeKind::Property {
                synthesized: true, ..
            } => continue,
            NodeKind::MemberFunction { .. } | NodeKind::Property { receiver: Some(_), .. } => {
                Some(Diagnostic::new(member, only_var.as_str(), Severity::Error)
                    .with_fix(FixAction::DeleteDeclaration { target: member }))
            }
            NodeKind::Property { mutable: false, .. } => {
                Some(Diagnostic::new(member, only_var.as_str(), Severity::Error)
                    .with_fix(FixAction::ConvertToMutable { property: member }))
            }
            NodeKind::Property { name: Some(name), .. }
                if kind == InterfaceKind::Props && config.is_reserved_prop(name) =>
            {
                Some(
                    Diagnostic::new(
                        member,
                        format!("\"{name}\" is reserved for React Special Property and cannot be used"),
                        Severity::Error,
                    )
                    .with_fix(FixAction::RenameIdentifier {
                        target: member,
                        new_name: None,
                    })
                    .with_fix(FixAction::DeleteDeclaration { target: member }),
                )
            }
            NodeKind::Property { name, .. } => {
                fields.push(Field {
                    declaration: member,
                    name: name.clone(),
                    declared_type: front_end.declared_type(member),
                });
                None
            }
            _ => None,
        };

        if let Some(diagnostic) = rejection {
            debug!(
                member = ?member,
                message = %diagnostic.message,
                "rejected interface member"
            );
            if let Some(sink) = sink.as_deref_mut() {
                sink.report(diagnostic);
            }
        }
    }

    AnalyzedInterface {
        interface: *interface,
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::SourceFrontEnd;

    fn props_interface(tree: &mut SyntaxTree, members: &[NodeId]) -> NodeId {
        let iface = tree.new_interface("FooProps", vec![Type::simple("RProps")], members);
        tree.add_top_level(iface)
    }

    #[test]
    fn test_accepts_var_properties_in_order() {
        let mut tree = SyntaxTree::new("a.kt");
        let b = tree.new_property("b", Some(Type::simple("Int")), true);
        let a = tree.new_property("a", Some(Type::simple("String")), true);
        let iface = props_interface(&mut tree, &[b, a]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let interface = FieldInterface::new(&tree, iface, &config).unwrap();

        let analyzed = analyze(&fe, &interface, None);
        let names: Vec<_> = analyzed.fields.iter().map(|f| f.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(analyzed.fields[0].declared_type, Some(Type::simple("Int")));
    }

    #[test]
    fn test_rejects_val_and_functions() {
        let mut tree = SyntaxTree::new("a.kt");
        let v = tree.new_property("v", Some(Type::simple("Int")), false);
        let f = tree.alloc(NodeKind::MemberFunction {
            name: "f".to_string(),
        });
        let ok = tree.new_property("ok", Some(Type::simple("Int")), true);
        let iface = props_interface(&mut tree, &[v, f, ok]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let interface = FieldInterface::new(&tree, iface, &config).unwrap();

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let analyzed = analyze(&fe, &interface, Some(&mut diagnostics));
        assert_eq!(analyzed.fields.len(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "Only var properties are allowed in RProps interfaces");
        assert_eq!(diagnostics[0].fixes, vec![FixAction::ConvertToMutable { property: v }]);
        assert_eq!(diagnostics[1].fixes, vec![FixAction::DeleteDeclaration { target: f }]);
    }

    #[test]
    fn test_reserved_props_excluded() {
        let mut tree = SyntaxTree::new("a.kt");
        let key = tree.new_property("key", Some(Type::simple("String")), true);
        let x = tree.new_property("x", Some(Type::simple("Int")), true);
        let iface = props_interface(&mut tree, &[key, x]);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let interface = FieldInterface::new(&tree, iface, &config).unwrap();

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let analyzed = analyze(&fe, &interface, Some(&mut diagnostics));
        assert_eq!(analyzed.fields.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "\"key\" is reserved for React Special Property and cannot be used"
        );
        assert_eq!(diagnostics[0].fixes.len(), 2);
    }

    #[test]
    fn test_synthesized_and_state_reserved_names_pass() {
        let mut tree = SyntaxTree::new("a.kt");
        let synth = tree.alloc(NodeKind::Property {
            name: Some("component1".to_string()),
            mutable: false,
            receiver: None,
            synthesized: true,
        });
        let key = tree.new_property("key", Some(Type::simple("String")), true);
        let iface = tree.new_interface("FooState", vec![Type::simple("RState")], &[synth, key]);
        tree.add_top_level(iface);
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(&tree, &config);
        let interface = FieldInterface::new(&tree, iface, &config).unwrap();
        assert_eq!(interface.kind, InterfaceKind::State);

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let analyzed = analyze(&fe, &interface, Some(&mut diagnostics));
        assert!(diagnostics.is_empty());
        assert_eq!(analyzed.fields.len(), 1);
    }

    #[test]
    fn test_non_field_interface() {
        let mut tree = SyntaxTree::new("a.kt");
        let iface = tree.new_interface("Other", vec![], &[]);
        tree.add_top_level(iface);
        assert!(FieldInterface::new(&tree, iface, &AnalysisConfig::default()).is_none());
    }
}
