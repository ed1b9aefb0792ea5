//! Component scaffolding offered while typing a class supertype

use crate::fixes::FixError;
use propflow_core::codegen::{create_field_interface, generate_builder_function};
use propflow_core::component::ComponentDeclaration;
use propflow_core::fields::InterfaceKind;
use propflow_core::frontend::SourceFrontEnd;
use propflow_core::{AnalysisConfig, NodeId, NodeKind, SyntaxTree, Type};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lookup element turning a class into a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCompletion {
    pub class: NodeId,
    pub lookup: String,
}

/// What accepting a [`ComponentCompletion`] created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedCompletion {
    pub component: ComponentDeclaration,
    pub props_interface: NodeId,
    pub render_function: NodeId,
    /// `None` when the class already had a builder function
    pub builder_function: Option<NodeId>,
}

/// Offer `RComponent<{Name}Props, RState>(props) { ... }` for a named class
pub fn complete_component_supertype(
    tree: &SyntaxTree,
    class: NodeId,
    config: &AnalysisConfig,
) -> Option<ComponentCompletion> {
    let NodeKind::Class { name } = tree.kind(class) else {
        return None;
    };
    Some(ComponentCompletion {
        class,
        lookup: format!(
            "{}<{name}Props, {}>(props) {{ ... }}",
            config.component_base, config.state_base
        ),
    })
}

/// Scaffold the component: base type, `render` override, props interface and builder function
///
/// Either every step applies or the tree is left as it was.
pub fn accept_component_completion(
    tree: &mut SyntaxTree,
    completion: &ComponentCompletion,
    config: &AnalysisConfig,
) -> Result<AcceptedCompletion, FixError> {
    let snapshot = tree.clone();
    let accepted = scaffold(tree, completion.class, config);
    if accepted.is_err() {
        *tree = snapshot;
    }
    accepted
}

fn scaffold(tree: &mut SyntaxTree, class: NodeId, config: &AnalysisConfig) -> Result<AcceptedCompletion, FixError> {
    if !matches!(tree.kind(class), NodeKind::Class { .. }) || !tree.is_attached(class) {
        return Err(FixError::StaleTarget(class));
    }

    let base = Type::generic(
        config.component_base.clone(),
        vec![
            Type::simple(config.props_base.clone()),
            Type::simple(config.state_base.clone()),
        ],
    );
    let entry = tree.new_super_type_entry(base, Some(&[]));
    match tree.super_type_entries(class).first() {
        Some(&typed) => {
            tree.replace(typed, entry);
        }
        None => {
            let index = usize::from(tree.parameter_list(class).is_some());
            tree.insert_child(class, index, entry);
        }
    }

    let todo = tree.new_call("TODO", &[], None);
    let body = tree.new_block(&[todo]);
    let render = tree.new_function(
        Some(config.render_function.as_str()),
        Some(Type::simple(config.builder_receiver.clone())),
        &[],
        body,
    );
    if let NodeKind::Function { is_override, .. } = tree.kind_mut(render) {
        *is_override = true;
    }
    tree.append_child(class, render);

    let component = ComponentDeclaration::from_class(tree, class, config).ok_or(FixError::StaleTarget(class))?;
    let props_interface = create_field_interface(tree, component, InterfaceKind::Props, config)?;

    let existing = component.find_builder_function(&SourceFrontEnd::new(tree, config));
    let builder_function = match existing {
        Some(_) => None,
        None => Some(generate_builder_function(tree, component, config)?.function),
    };
    debug!(class = ?class, "scaffolded component");

    Ok(AcceptedCompletion {
        component,
        props_interface,
        render_function: render,
        builder_function,
    })
}
