//! # Propflow Core
//!
//! Definite-assignment analysis of component props and synchronization of
//! component builder functions.
//!
//! A component declares its props as mutable properties of an interface.
//! Builder functions construct the component through a trailing lambda that
//! assigns those properties. This crate answers, per construction site,
//! which declared fields are assigned on every path through the lambda, and
//! edits the builder function to close the gap.
//!
//! ## Modules
//!
//! - **[`syntax`]** - Arena syntax tree, accessors, constructors and rendering
//! - **[`frontend`]** - The [`FrontEnd`] trait and the in-memory reference front-end
//! - **[`fields`]** - Field registry over props and state interfaces
//! - **[`dataflow`]** - Control flow graphs, assignment state and the backward solver
//! - **[`gaps`]** - Declared fields versus assigned fields
//! - **[`component`]** - Components, builder functions, construction calls, state initializers
//! - **[`codegen`]** - Builder synchronization, generation and scaffolding edits
//!
//! ## Quick Start
//!
//! ```rust
//! use propflow_core::prelude::*;
//!
//! let config = AnalysisConfig::default();
//! let mut tree = SyntaxTree::new("Playground.kt");
//! let x = tree.new_property("x", Some(Type::simple("Int")), true);
//! let props = tree.new_interface("PlaygroundProps", vec![Type::simple("RProps")], &[x]);
//! tree.add_top_level(props);
//! let base = Type::generic("RComponent", vec![Type::simple("PlaygroundProps"), Type::simple("RState")]);
//! let entry = tree.new_super_type_entry(base, None);
//! let class = tree.new_class("Playground", None, &[entry], &[]);
//! tree.add_top_level(class);
//!
//! let component = ComponentDeclaration::from_class(&tree, class, &config).unwrap();
//! let builder = generate_builder_function(&mut tree, component, &config).unwrap();
//! assert_eq!(actualize(&mut tree, &builder, &config), Ok(0));
//! ```

pub mod codegen;
pub mod component;
pub mod config;
pub mod dataflow;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod frontend;
pub mod gaps;
pub mod syntax;
pub mod types;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::codegen::{actualize, generate_builder_function, remove_field, BuilderFunctionGenerator};
    pub use crate::component::{BuilderExpression, BuilderFunction, ComponentDeclaration, StateInitFunction};
    pub use crate::config::AnalysisConfig;
    pub use crate::dataflow::{CfgSolver, FieldAssignmentState, WriteMatcher};
    pub use crate::diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticSink, FixAction, Severity};
    pub use crate::error::CodegenError;
    pub use crate::fields::{analyze, Field, FieldInterface, InterfaceKind};
    pub use crate::frontend::{FrontEnd, SourceFrontEnd};
    pub use crate::gaps::{compute_gaps, GapReport};
    pub use crate::syntax::{render, NodeId, NodeKind, SyntaxTree};
    pub use crate::types::Type;
}

// Re-export main types at crate root for convenience
pub use config::AnalysisConfig;
pub use error::{CodegenError, ConfigError};
pub use frontend::{FrontEnd, SourceFrontEnd};
pub use syntax::{NodeId, NodeKind, SyntaxTree};
pub use types::Type;
