//! Component model
//!
//! Views over the syntax tree: a component class, its builder function,
//! the construction expressions inside builder functions, and state
//! initializers. Views hold node ids only and re-derive everything from the
//! tree on each query, so they stay valid across edits as long as the
//! underlying nodes are attached.

mod builder;
mod state_init;

pub use builder::{BuilderExpression, BuilderFunction, UninitializedFields};
pub use state_init::StateInitFunction;

use crate::config::AnalysisConfig;
use crate::fields::{FieldInterface, InterfaceKind};
use crate::frontend::FrontEnd;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;
use tracing::debug;

/// A class extending the component base type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentDeclaration {
    pub class: NodeId,
    /// Supertype entry naming the component base type
    pub base_entry: NodeId,
}

impl ComponentDeclaration {
    pub fn from_class(tree: &SyntaxTree, class: NodeId, config: &AnalysisConfig) -> Option<Self> {
        if !matches!(tree.kind(class), NodeKind::Class { .. }) {
            return None;
        }
        let base_entry = tree.super_type_entries(class).into_iter().find(|&entry| {
            matches!(tree.kind(entry), NodeKind::SuperTypeEntry { ty, .. } if ty.is_class(&config.component_base))
        })?;
        Some(Self { class, base_entry })
    }

    /// Every top-level component class
    pub fn all(tree: &SyntaxTree, config: &AnalysisConfig) -> Vec<Self> {
        tree.significant_children(tree.root())
            .filter_map(|decl| Self::from_class(tree, decl, config))
            .collect()
    }

    pub fn name<'t>(&self, tree: &'t SyntaxTree) -> Option<&'t str> {
        tree.name(self.class)
    }

    /// The component base type as written, e.g. `RComponent<FooProps, FooState>`
    pub fn component_type<'t>(&self, tree: &'t SyntaxTree) -> Option<&'t Type> {
        match tree.kind(self.base_entry) {
            NodeKind::SuperTypeEntry { ty, .. } => Some(ty),
            _ => None,
        }
    }

    pub fn field_type(&self, tree: &SyntaxTree, kind: InterfaceKind) -> Option<Type> {
        self.component_type(tree)?
            .arg(kind.type_argument_index())
            .cloned()
    }

    pub fn props_type(&self, tree: &SyntaxTree) -> Option<Type> {
        self.field_type(tree, InterfaceKind::Props)
    }

    pub fn state_type(&self, tree: &SyntaxTree) -> Option<Type> {
        self.field_type(tree, InterfaceKind::State)
    }

    /// Simple name of the props or state type, defaulting to the base type name
    pub fn field_type_simple_name(&self, tree: &SyntaxTree, config: &AnalysisConfig, kind: InterfaceKind) -> String {
        self.field_type(tree, kind)
            .map(|ty| ty.simple_name().to_string())
            .unwrap_or_else(|| kind.base_type(config).to_string())
    }

    pub fn props_type_simple_name(&self, tree: &SyntaxTree, config: &AnalysisConfig) -> String {
        self.field_type_simple_name(tree, config, InterfaceKind::Props)
    }

    pub fn state_type_simple_name(&self, tree: &SyntaxTree, config: &AnalysisConfig) -> String {
        self.field_type_simple_name(tree, config, InterfaceKind::State)
    }

    /// Whether the props type is a dedicated interface rather than the base type
    pub fn has_props(&self, tree: &SyntaxTree, config: &AnalysisConfig) -> bool {
        self.props_type(tree)
            .is_some_and(|ty| !ty.is_class(&config.props_base))
    }

    pub fn has_state(&self, tree: &SyntaxTree, config: &AnalysisConfig) -> bool {
        self.state_type(tree)
            .is_some_and(|ty| !ty.is_class(&config.state_base))
    }

    /// Interface declaration behind the props or state type argument
    pub fn find_field_interface(&self, front_end: &dyn FrontEnd, kind: InterfaceKind) -> Option<FieldInterface> {
        let tree = front_end.tree();
        let ty = self.field_type(tree, kind)?;
        let decl = tree.find_top_level(ty.simple_name(), |k| matches!(k, NodeKind::Interface { .. }))?;
        FieldInterface::new(tree, decl, front_end.config()).filter(|iface| iface.kind == kind)
    }

    pub fn find_props_interface(&self, front_end: &dyn FrontEnd) -> Option<FieldInterface> {
        self.find_field_interface(front_end, InterfaceKind::Props)
    }

    pub fn find_state_interface(&self, front_end: &dyn FrontEnd) -> Option<FieldInterface> {
        self.find_field_interface(front_end, InterfaceKind::State)
    }

    /// Whether the base type is called with a first argument: `RComponent<P, S>(props)`
    pub fn is_props_passed_in_constructor(&self, tree: &SyntaxTree) -> bool {
        matches!(tree.kind(self.base_entry), NodeKind::SuperTypeEntry { call: true, .. })
            && !tree.statements(self.base_entry).is_empty()
    }

    /// Conventional builder function name: the class name with a lowercase first letter
    pub fn builder_function_name(&self, tree: &SyntaxTree) -> Option<String> {
        self.name(tree).map(lowercase_first)
    }

    /// Sibling function with the builder name and the builder receiver type
    pub fn find_builder_function(&self, front_end: &dyn FrontEnd) -> Option<BuilderFunction> {
        let tree = front_end.tree();
        let config = front_end.config();
        let name = self.builder_function_name(tree)?;
        let container = tree.declaration_container(self.class)?;
        let function = tree.significant_children(container).find(|&decl| {
            matches!(
                tree.kind(decl),
                NodeKind::Function { name: Some(n), receiver: Some(r), .. }
                    if *n == name && r.is_class(&config.builder_receiver)
            )
        });
        if function.is_none() {
            debug!(component = ?self.name(tree), builder = %name, "no builder function");
        }
        function.map(|function| BuilderFunction {
            component: *self,
            function,
        })
    }

    /// State initializer overrides: `init()` and `init(props)`
    pub fn find_state_init_functions(&self, front_end: &dyn FrontEnd) -> Vec<StateInitFunction> {
        let tree = front_end.tree();
        let config = front_end.config();
        let props_type = self.props_type(tree);
        tree.members(self.class)
            .into_iter()
            .filter_map(|member| {
                let NodeKind::Function {
                    name: Some(name),
                    receiver: Some(_),
                    ..
                } = tree.kind(member)
                else {
                    return None;
                };
                if *name != config.state_init_function {
                    return None;
                }
                match tree.parameters(member).as_slice() {
                    [] => Some(StateInitFunction {
                        component: *self,
                        function: member,
                        props_parameter: None,
                    }),
                    [param] if props_type.is_none() || tree.written_type(*param) == props_type.as_ref() => {
                        Some(StateInitFunction {
                            component: *self,
                            function: member,
                            props_parameter: Some(*param),
                        })
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Construction calls `child(C::class) { ... }` anywhere in the tree
    pub fn find_construction_calls(&self, front_end: &dyn FrontEnd) -> Vec<BuilderExpression> {
        let tree = front_end.tree();
        front_end
            .find_call_sites(self.class)
            .into_iter()
            .filter(|&site| matches!(tree.kind(site), NodeKind::ClassLiteral { .. }))
            .filter_map(|site| tree.parent(site))
            .filter_map(|call| BuilderExpression::from_call(front_end, call))
            .filter(|expression| expression.component == *self)
            .collect()
    }
}

pub fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
