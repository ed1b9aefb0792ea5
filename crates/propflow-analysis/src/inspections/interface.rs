//! Props and state interface inspection

use super::Inspection;
use propflow_core::diagnostics::{Diagnostic, DiagnosticCollector, FixAction, Severity};
use propflow_core::fields::{analyze, FieldInterface};
use propflow_core::frontend::FrontEnd;
use propflow_core::syntax::NodeKind;

/// Reports rejected members and empty field interfaces
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceInspection;

impl Inspection for InterfaceInspection {
    fn name(&self) -> &'static str {
        "interface"
    }

    fn check(&self, front_end: &dyn FrontEnd, sink: &mut DiagnosticCollector) {
        let tree = front_end.tree();
        let interfaces = tree
            .significant_children(tree.root())
            .filter(|&decl| matches!(tree.kind(decl), NodeKind::Interface { .. }))
            .filter_map(|decl| FieldInterface::new(tree, decl, front_end.config()));

        for interface in interfaces {
            let analyzed = analyze(front_end, &interface, Some(&mut *sink));
            if analyzed.is_empty() {
                sink.report_once(
                    Diagnostic::new(
                        interface.declaration,
                        format!("There are no props in {}", interface.kind.title()),
                        Severity::LikeUnused,
                    )
                    .with_fix(FixAction::DeleteInterface {
                        interface: interface.declaration,
                        kind: interface.kind,
                    }),
                );
            }
        }
    }
}
