//! Diagnostics and fix actions reported by the registry and the inspections

use crate::fields::InterfaceKind;
use crate::syntax::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    WeakWarning,
    /// Rendered as unused code
    LikeUnused,
}

/// Edit a host may apply in response to a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixAction {
    ConvertToMutable { property: NodeId },
    /// Rename a declaration; without a name the host must prompt for one
    RenameIdentifier { target: NodeId, new_name: Option<String> },
    DeleteDeclaration { target: NodeId },
    DeleteInterface { interface: NodeId, kind: InterfaceKind },
    RegenerateBuilderFunction { component: NodeId },
    SynchronizeBuilderFunction { builder_function: NodeId },
    AddConstructorParameter { component: NodeId },
}

impl FixAction {
    pub fn title(&self) -> String {
        match self {
            FixAction::ConvertToMutable { .. } => "Make var".to_string(),
            FixAction::RenameIdentifier {
                new_name: Some(name),
                ..
            } => format!("Rename to \"{name}\""),
            FixAction::RenameIdentifier { new_name: None, .. } => "Rename".to_string(),
            FixAction::DeleteDeclaration { .. } => "Delete".to_string(),
            FixAction::DeleteInterface { kind, .. } => format!("Delete {}", kind.title()),
            FixAction::RegenerateBuilderFunction { .. } => "Regenerate builder function".to_string(),
            FixAction::SynchronizeBuilderFunction { .. } => "Update builder function".to_string(),
            FixAction::AddConstructorParameter { .. } => "Add props constructor parameter".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: NodeId,
    pub message: String,
    pub severity: Severity,
    pub fixes: Vec<FixAction>,
}

impl Diagnostic {
    pub fn new(location: NodeId, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            location,
            message: message.into(),
            severity,
            fixes: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: FixAction) -> Self {
        self.fixes.push(fix);
        self
    }
}

/// Receiver of diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collector that can drop repeats of the same message at the same location
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    reported: HashSet<(NodeId, String)>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report unless the same message was already reported at the same location
    pub fn report_once(&mut self, diagnostic: Diagnostic) {
        if self
            .reported
            .insert((diagnostic.location, diagnostic.message.clone()))
        {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported
            .insert((diagnostic.location, diagnostic.message.clone()));
        self.diagnostics.push(diagnostic);
    }
}
