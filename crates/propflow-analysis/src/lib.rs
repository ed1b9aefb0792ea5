//! # Propflow Analysis
//!
//! Inspections, fix actions and completion scaffolding on top of
//! `propflow-core`.
//!
//! ## Modules
//!
//! - **[`inspections`]** - Props and state interface checks, component checks, construction call checks
//! - **[`fixes`]** - Applying the fix actions attached to diagnostics
//! - **[`completion`]** - Turning a plain class into a component
//!
//! ## Quick Start
//!
//! ```rust
//! use propflow_analysis::prelude::*;
//! use propflow_core::prelude::*;
//!
//! let config = AnalysisConfig::default();
//! let mut tree = SyntaxTree::new("Playground.kt");
//! let x = tree.new_property("x", Some(Type::simple("Int")), false);
//! let props = tree.new_interface("PlaygroundProps", vec![Type::simple("RProps")], &[x]);
//! tree.add_top_level(props);
//!
//! let diagnostics = inspect(&tree, &config);
//! let fix = diagnostics[0].fixes[0].clone();
//! apply_fix(&mut tree, &fix, &config).unwrap();
//! assert!(inspect(&tree, &config).is_empty());
//! ```

pub mod completion;
pub mod fixes;
pub mod inspections;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::completion::{
        accept_component_completion, complete_component_supertype, AcceptedCompletion, ComponentCompletion,
    };
    pub use crate::fixes::{apply_fix, FixError};
    pub use crate::inspections::{
        inspect, BuilderExpressionInspection, ComponentInspection, Inspection, InterfaceInspection, Inspector,
    };
}

// Re-export main types at crate root for convenience
pub use completion::{accept_component_completion, complete_component_supertype, ComponentCompletion};
pub use fixes::{apply_fix, FixError};
pub use inspections::{inspect, Inspection, Inspector};
