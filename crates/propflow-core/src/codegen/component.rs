//! Component and field-interface scaffolding edits

use crate::component::ComponentDeclaration;
use crate::config::AnalysisConfig;
use crate::error::CodegenError;
use crate::fields::{FieldInterface, InterfaceKind};
use crate::frontend::SourceFrontEnd;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};
use crate::types::Type;
use tracing::debug;

/// Name of the primary constructor parameter that receives the props
pub const PROPS_PARAMETER: &str = "props";

/// Replace the props or state type argument of the component base type
///
/// Returns false when the base type has no argument at that position.
pub fn set_type_argument(tree: &mut SyntaxTree, component: ComponentDeclaration, kind: InterfaceKind, ty: Type) -> bool {
    let NodeKind::SuperTypeEntry { ty: base, .. } = tree.kind_mut(component.base_entry) else {
        return false;
    };
    match base.args.get_mut(kind.type_argument_index()) {
        Some(arg) => {
            *arg = ty;
            true
        }
        None => false,
    }
}

/// Drop the primary constructor of the component class
pub fn remove_props_constructor_argument(tree: &mut SyntaxTree, component: ComponentDeclaration) {
    if let Some(list) = tree.parameter_list(component.class) {
        tree.detach(list);
    }
}

/// Make the primary constructor `(props: P)` and forward it to the base type
pub fn set_props_constructor_argument(
    tree: &mut SyntaxTree,
    component: ComponentDeclaration,
    props_type: Type,
) -> Result<(), CodegenError> {
    ensure_attached(tree, component.class)?;
    let passed = component.is_props_passed_in_constructor(tree);

    remove_props_constructor_argument(tree, component);
    let parameter = tree.new_parameter(PROPS_PARAMETER, Some(props_type), None);
    let list = tree.new_parameter_list(&[parameter]);
    tree.insert_child(component.class, 0, list);

    if !passed {
        let forwarded = tree.new_name_ref(PROPS_PARAMETER);
        reset_super_call(tree, component.base_entry, &[forwarded]);
    }
    Ok(())
}

/// Drop the primary constructor and turn the base type into `RComponent<RProps, S>()`
pub fn remove_props_constructor_argument_and_super_call(
    tree: &mut SyntaxTree,
    component: ComponentDeclaration,
    config: &AnalysisConfig,
) -> Result<(), CodegenError> {
    ensure_attached(tree, component.class)?;
    let state = component
        .state_type(tree)
        .unwrap_or_else(|| Type::simple(config.state_base.clone()));

    remove_props_constructor_argument(tree, component);
    if let NodeKind::SuperTypeEntry { ty, .. } = tree.kind_mut(component.base_entry) {
        *ty = Type::generic(ty.name.clone(), vec![Type::simple(config.props_base.clone()), state]);
    }
    reset_super_call(tree, component.base_entry, &[]);
    Ok(())
}

/// Create `interface {Component}{Suffix} : {base}` and wire it into the component
///
/// The file keeps the order props interface, state interface, component.
pub fn create_field_interface(
    tree: &mut SyntaxTree,
    component: ComponentDeclaration,
    kind: InterfaceKind,
    config: &AnalysisConfig,
) -> Result<NodeId, CodegenError> {
    ensure_attached(tree, component.class)?;
    let (anchor, name) = {
        let front_end = SourceFrontEnd::new(tree, config);
        if let Some(existing) = component.find_field_interface(&front_end, kind) {
            return Err(CodegenError::InterfaceExists(existing.declaration));
        }
        let component_name = component
            .name(tree)
            .ok_or(CodegenError::NotAComponent(component.class))?;
        let anchor = match kind {
            InterfaceKind::Props => component
                .find_state_interface(&front_end)
                .map(|state| state.declaration)
                .unwrap_or(component.class),
            InterfaceKind::State => component.class,
        };
        (anchor, format!("{component_name}{}", kind.suffix()))
    };

    let interface = tree.new_interface(&name, vec![Type::simple(kind.base_type(config))], &[]);
    if !tree.insert_before(anchor, interface) {
        return Err(CodegenError::DetachedNode(anchor));
    }
    set_type_argument(tree, component, kind, Type::simple(name.clone()));
    if kind == InterfaceKind::Props {
        set_props_constructor_argument(tree, component, Type::simple(name.clone()))?;
    }
    debug!(interface = %name, kind = kind.title(), "created field interface");
    Ok(interface)
}

/// Delete a props or state interface, rewiring every component that uses it
///
/// Props: the constructor argument, the super call argument and the props
/// parameter of state initializers go. State: the type argument falls back
/// to the base type and state initializers are deleted. Returns the number
/// of rewired components.
pub fn delete_interface(
    tree: &mut SyntaxTree,
    interface: FieldInterface,
    config: &AnalysisConfig,
) -> Result<usize, CodegenError> {
    ensure_attached(tree, interface.declaration)?;
    let users = {
        let front_end = SourceFrontEnd::new(tree, config);
        ComponentDeclaration::all(tree, config)
            .into_iter()
            .filter(|component| {
                component
                    .find_field_interface(&front_end, interface.kind)
                    .is_some_and(|found| found.declaration == interface.declaration)
            })
            .map(|component| (component, component.find_state_init_functions(&front_end)))
            .collect::<Vec<_>>()
    };

    for (component, initializers) in &users {
        match interface.kind {
            InterfaceKind::Props => {
                remove_props_constructor_argument_and_super_call(tree, *component, config)?;
                for parameter in initializers.iter().filter_map(|init| init.props_parameter) {
                    tree.detach(parameter);
                }
            }
            InterfaceKind::State => {
                set_type_argument(tree, *component, interface.kind, Type::simple(config.state_base.clone()));
                for initializer in initializers {
                    tree.detach(initializer.function);
                }
            }
        }
    }
    tree.detach(interface.declaration);
    debug!(interface = ?interface.declaration, components = users.len(), "deleted field interface");
    Ok(users.len())
}

fn ensure_attached(tree: &SyntaxTree, node: NodeId) -> Result<(), CodegenError> {
    if tree.is_attached(node) {
        Ok(())
    } else {
        Err(CodegenError::DetachedNode(node))
    }
}

/// Make a supertype entry a constructor call with exactly `args`
fn reset_super_call(tree: &mut SyntaxTree, entry: NodeId, args: &[NodeId]) {
    if let NodeKind::SuperTypeEntry { call, .. } = tree.kind_mut(entry) {
        *call = true;
    }
    for child in tree.children(entry).to_vec() {
        tree.detach(child);
    }
    for &arg in args {
        tree.append_child(entry, arg);
    }
}
