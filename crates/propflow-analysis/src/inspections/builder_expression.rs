//! Construction call inspection
//!
//! Every `child(C::class) { ... }` call is checked against the props of
//! `C`. Findings inside a builder function point at the builder, the props
//! declarations and the component, all with a synchronize fix; findings in
//! any other call are reported once at the call.

use super::Inspection;
use propflow_core::component::BuilderExpression;
use propflow_core::diagnostics::{Diagnostic, DiagnosticCollector, FixAction, Severity};
use propflow_core::frontend::FrontEnd;
use propflow_core::syntax::NodeKind;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuilderExpressionInspection;

impl Inspection for BuilderExpressionInspection {
    fn name(&self) -> &'static str {
        "builder-expression"
    }

    fn check(&self, front_end: &dyn FrontEnd, sink: &mut DiagnosticCollector) {
        let tree = front_end.tree();
        for node in tree.descendants(tree.root()) {
            if !matches!(tree.kind(node), NodeKind::Call) {
                continue;
            }
            if let Some(expression) = BuilderExpression::from_call(front_end, node) {
                check_expression(front_end, &expression, sink);
            }
        }
    }
}

fn check_expression(front_end: &dyn FrontEnd, expression: &BuilderExpression, sink: &mut DiagnosticCollector) {
    let tree = front_end.tree();
    let config = front_end.config();
    let component = expression.component;
    let Some(report) = expression.gap_report(front_end) else {
        trace!(call = ?expression.call, "no props interface to check against");
        return;
    };
    let builder = expression.find_containing_builder_function(front_end);
    let synchronize = builder.map(|builder| FixAction::SynchronizeBuilderFunction {
        builder_function: builder.function,
    });

    if let Some(builder) = &builder {
        let expected = component.builder_function_name(tree);
        if let Some(expected) = expected.filter(|expected| builder.name(tree) != Some(expected.as_str())) {
            sink.report_once(
                Diagnostic::new(
                    builder.function,
                    format!("Component builder function should be named as \"{expected}\""),
                    Severity::WeakWarning,
                )
                .with_fix(FixAction::RenameIdentifier {
                    target: builder.function,
                    new_name: Some(expected),
                }),
            );
        }
    }

    let has_unknown = !report.unknown_assignments.is_empty();
    let has_outdated = !report.outdated_param_fields.is_empty();
    let mut has_uninitialized = false;
    let children_used = !report.children_not_set;

    for field in &report.missing_fields {
        if field.name.as_deref().is_some_and(|name| config.is_reserved_prop(name)) {
            continue;
        }
        if let Some(fix) = &synchronize {
            sink.report_once(
                Diagnostic::new(
                    field.declaration,
                    "Value is not initialized in component builder function",
                    Severity::WeakWarning,
                )
                .with_fix(fix.clone()),
            );
        }
        has_uninitialized = true;
    }

    if let Some(fix) = &synchronize {
        for outdated in &report.outdated_param_fields {
            sink.report_once(
                Diagnostic::new(
                    outdated.field.declaration,
                    "Builder function has outdated parameter type",
                    Severity::WeakWarning,
                )
                .with_fix(fix.clone()),
            );
        }
    }

    if !(has_uninitialized || children_used || has_unknown || has_outdated) {
        return;
    }
    // Outdated parameter types alone do not count as uninitialized vars
    let message = if children_used {
        "Children is used in component, but not initialized".to_string()
    } else if has_uninitialized {
        format!(
            "All {} vars should be initialized",
            component.props_type_simple_name(tree, config)
        )
    } else if has_outdated {
        "Builder function contains outdated parameter types".to_string()
    } else {
        "Builder function contains outdated assignments".to_string()
    };

    match (builder, synchronize) {
        (Some(builder), Some(fix)) => {
            sink.report_once(Diagnostic::new(builder.function, message, Severity::Warning).with_fix(fix.clone()));
            sink.report_once(
                Diagnostic::new(component.class, "Outdated builder function", Severity::WeakWarning)
                    .with_fix(fix.clone()),
            );
            if has_unknown {
                if let Some(props) = component.find_props_interface(front_end) {
                    sink.report_once(
                        Diagnostic::new(
                            props.declaration,
                            "Builder function contains outdated assignments",
                            Severity::WeakWarning,
                        )
                        .with_fix(fix),
                    );
                }
            }
        }
        _ => {
            let location = tree.call_callee(expression.call).unwrap_or(expression.call);
            sink.report_once(Diagnostic::new(location, message, Severity::Warning));
        }
    }
}
