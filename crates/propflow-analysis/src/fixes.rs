//! Fix action application
//!
//! Fixes carry node ids only. Applying one re-derives the component views
//! from the current tree, so a fix computed before other edits either still
//! applies or fails with [`FixError::StaleTarget`].

use propflow_core::codegen::{
    actualize, delete_interface, generate_builder_function, remove_field, set_props_constructor_argument,
};
use propflow_core::component::{BuilderFunction, ComponentDeclaration};
use propflow_core::diagnostics::FixAction;
use propflow_core::error::CodegenError;
use propflow_core::fields::{Field, FieldInterface, InterfaceKind};
use propflow_core::frontend::{FrontEnd, SourceFrontEnd};
use propflow_core::{AnalysisConfig, NodeId, NodeKind, SyntaxTree};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    #[error("rename of {0:?} needs a new name")]
    MissingName(NodeId),
    #[error("fix target {0:?} no longer matches the tree")]
    StaleTarget(NodeId),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Apply `fix` to `tree`
pub fn apply_fix(tree: &mut SyntaxTree, fix: &FixAction, config: &AnalysisConfig) -> Result<(), FixError> {
    debug!(fix = %fix.title(), "applying fix");
    match fix {
        FixAction::ConvertToMutable { property } => {
            let target = attached(tree, *property)?;
            match tree.kind_mut(target) {
                NodeKind::Property { mutable, .. } => {
                    *mutable = true;
                    Ok(())
                }
                _ => Err(FixError::StaleTarget(target)),
            }
        }
        FixAction::RenameIdentifier { target, new_name } => {
            let new_name = new_name.as_deref().ok_or(FixError::MissingName(*target))?;
            let target = attached(tree, *target)?;
            if rename(tree.kind_mut(target), new_name) {
                Ok(())
            } else {
                Err(FixError::StaleTarget(target))
            }
        }
        FixAction::DeleteDeclaration { target } => delete_declaration(tree, *target, config),
        FixAction::DeleteInterface { interface, kind } => {
            let interface = field_interface(tree, *interface, *kind, config)?;
            delete_interface(tree, interface, config)?;
            Ok(())
        }
        FixAction::RegenerateBuilderFunction { component } => {
            let component = component_at(tree, *component, config)?;
            let existing = component.find_builder_function(&SourceFrontEnd::new(tree, config));
            if let Some(existing) = existing {
                tree.detach(existing.function);
            }
            generate_builder_function(tree, component, config)?;
            Ok(())
        }
        FixAction::SynchronizeBuilderFunction { builder_function } => {
            let target = attached(tree, *builder_function)?;
            let builder = BuilderFunction::from_function(&SourceFrontEnd::new(tree, config), target)
                .ok_or(FixError::StaleTarget(target))?;
            actualize(tree, &builder, config)?;
            Ok(())
        }
        FixAction::AddConstructorParameter { component } => {
            let component = component_at(tree, *component, config)?;
            let props_type = component
                .props_type(tree)
                .ok_or(FixError::StaleTarget(component.class))?;
            set_props_constructor_argument(tree, component, props_type)?;
            Ok(())
        }
    }
}

/// Delete a declaration; props fields are first removed from every builder function
fn delete_declaration(tree: &mut SyntaxTree, target: NodeId, config: &AnalysisConfig) -> Result<(), FixError> {
    let target = attached(tree, target)?;
    let (field, builders) = {
        let front_end = SourceFrontEnd::new(tree, config);
        let owner = tree
            .parent(target)
            .and_then(|parent| FieldInterface::new(tree, parent, config))
            .filter(|interface| interface.kind == InterfaceKind::Props);
        match (owner, tree.kind(target)) {
            (Some(interface), NodeKind::Property { name, .. }) => {
                let field = Field {
                    declaration: target,
                    name: name.clone(),
                    declared_type: front_end.declared_type(target),
                };
                let builders: Vec<BuilderFunction> = ComponentDeclaration::all(tree, config)
                    .into_iter()
                    .filter(|component| {
                        component
                            .find_props_interface(&front_end)
                            .is_some_and(|found| found.declaration == interface.declaration)
                    })
                    .filter_map(|component| component.find_builder_function(&front_end))
                    .collect();
                (Some(field), builders)
            }
            _ => (None, Vec::new()),
        }
    };

    if let Some(field) = &field {
        for builder in &builders {
            match remove_field(tree, builder, field, config) {
                Ok(_) => {}
                Err(CodegenError::MissingConstructionCall(_) | CodegenError::MissingLambdaBody(_)) => {
                    debug!(function = ?builder.function, "builder function has no construction lambda");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
    tree.detach(target);
    Ok(())
}

fn rename(kind: &mut NodeKind, new_name: &str) -> bool {
    match kind {
        NodeKind::Interface { name, .. }
        | NodeKind::Class { name }
        | NodeKind::MemberFunction { name }
        | NodeKind::Parameter { name, .. } => *name = new_name.to_string(),
        NodeKind::Property { name, .. } | NodeKind::Function { name, .. } => *name = Some(new_name.to_string()),
        _ => return false,
    }
    true
}

fn attached(tree: &SyntaxTree, node: NodeId) -> Result<NodeId, FixError> {
    if tree.contains(node) && tree.is_attached(node) {
        Ok(node)
    } else {
        Err(FixError::StaleTarget(node))
    }
}

fn component_at(tree: &SyntaxTree, class: NodeId, config: &AnalysisConfig) -> Result<ComponentDeclaration, FixError> {
    let class = attached(tree, class)?;
    ComponentDeclaration::from_class(tree, class, config).ok_or(FixError::StaleTarget(class))
}

fn field_interface(
    tree: &SyntaxTree,
    interface: NodeId,
    kind: InterfaceKind,
    config: &AnalysisConfig,
) -> Result<FieldInterface, FixError> {
    let interface = attached(tree, interface)?;
    FieldInterface::new(tree, interface, config)
        .filter(|found| found.kind == kind)
        .ok_or(FixError::StaleTarget(interface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use propflow_core::Type;

    #[test]
    fn test_convert_to_mutable() {
        let mut tree = SyntaxTree::new("a.kt");
        let x = tree.new_property("x", Some(Type::simple("Int")), false);
        let iface = tree.new_interface("FooProps", vec![Type::simple("RProps")], &[x]);
        tree.add_top_level(iface);
        let config = AnalysisConfig::default();

        apply_fix(&mut tree, &FixAction::ConvertToMutable { property: x }, &config).unwrap();
        assert!(matches!(tree.kind(x), NodeKind::Property { mutable: true, .. }));
    }

    #[test]
    fn test_rename_requires_name() {
        let mut tree = SyntaxTree::new("a.kt");
        let key = tree.new_property("key", None, true);
        let iface = tree.new_interface("FooProps", vec![Type::simple("RProps")], &[key]);
        tree.add_top_level(iface);
        let config = AnalysisConfig::default();

        let unnamed = FixAction::RenameIdentifier {
            target: key,
            new_name: None,
        };
        assert_eq!(apply_fix(&mut tree, &unnamed, &config), Err(FixError::MissingName(key)));

        let named = FixAction::RenameIdentifier {
            target: key,
            new_name: Some("itemKey".to_string()),
        };
        apply_fix(&mut tree, &named, &config).unwrap();
        assert_eq!(tree.name(key), Some("itemKey"));
    }

    #[test]
    fn test_detached_target_is_stale() {
        let mut tree = SyntaxTree::new("a.kt");
        let loose = tree.new_property("x", None, false);
        let config = AnalysisConfig::default();
        assert_eq!(
            apply_fix(&mut tree, &FixAction::ConvertToMutable { property: loose }, &config),
            Err(FixError::StaleTarget(loose))
        );
    }
}
