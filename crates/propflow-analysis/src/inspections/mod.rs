//! Inspections over a syntax tree
//!
//! Each inspection walks the tree through a [`FrontEnd`] and reports into a
//! shared [`DiagnosticCollector`]. Diagnostics carry the fix actions a host
//! can hand back to [`crate::fixes::apply_fix`].

mod builder_expression;
mod component;
mod interface;

pub use builder_expression::BuilderExpressionInspection;
pub use component::ComponentInspection;
pub use interface::InterfaceInspection;

use propflow_core::diagnostics::{Diagnostic, DiagnosticCollector};
use propflow_core::frontend::{FrontEnd, SourceFrontEnd};
use propflow_core::{AnalysisConfig, SyntaxTree};
use tracing::debug;

pub trait Inspection {
    fn name(&self) -> &'static str;

    fn check(&self, front_end: &dyn FrontEnd, sink: &mut DiagnosticCollector);
}

/// Runs a fixed set of inspections in order
pub struct Inspector {
    inspections: Vec<Box<dyn Inspection>>,
}

impl Inspector {
    /// Interface, component and construction call inspections
    pub fn new() -> Self {
        Self {
            inspections: vec![
                Box::new(InterfaceInspection),
                Box::new(ComponentInspection),
                Box::new(BuilderExpressionInspection),
            ],
        }
    }

    pub fn with_inspections(inspections: Vec<Box<dyn Inspection>>) -> Self {
        Self { inspections }
    }

    pub fn run(&self, front_end: &dyn FrontEnd) -> Vec<Diagnostic> {
        let mut sink = DiagnosticCollector::new();
        for inspection in &self.inspections {
            let before = sink.diagnostics().len();
            inspection.check(front_end, &mut sink);
            debug!(
                inspection = inspection.name(),
                reported = sink.diagnostics().len() - before,
                "inspection finished"
            );
        }
        sink.into_diagnostics()
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every inspection over `tree` with the reference front-end
pub fn inspect(tree: &SyntaxTree, config: &AnalysisConfig) -> Vec<Diagnostic> {
    Inspector::new().run(&SourceFrontEnd::new(tree, config))
}
