//! Analysis configuration
//!
//! Framework names the analysis keys on. The defaults describe the
//! kotlin-react wrappers; hosts targeting a fork with renamed base types can
//! load their own table from JSON.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base class of components, e.g. `RComponent<P, S>`
    pub component_base: String,
    pub props_base: String,
    pub state_base: String,
    /// Receiver type of builder functions
    pub builder_receiver: String,
    /// Receiver type inside a construction lambda
    pub element_builder: String,
    /// Type of the trailing children handler parameter
    pub handler_type: String,
    /// Function that constructs a component: `child(C::class) { ... }`
    pub construction_function: String,
    /// Member of the element builder holding the props instance
    pub attrs_member: String,
    /// Name of the state initializer override
    pub state_init_function: String,
    /// Props names taken by the framework itself
    pub reserved_props: Vec<String>,
    /// Base name of the children handler parameter in generated functions
    pub body_parameter: String,
    pub render_function: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            component_base: "RComponent".to_string(),
            props_base: "RProps".to_string(),
            state_base: "RState".to_string(),
            builder_receiver: "RBuilder".to_string(),
            element_builder: "RElementBuilder".to_string(),
            handler_type: "RHandler".to_string(),
            construction_function: "child".to_string(),
            attrs_member: "attrs".to_string(),
            state_init_function: "init".to_string(),
            reserved_props: vec!["key".to_string(), "ref".to_string(), "children".to_string()],
            body_parameter: "body".to_string(),
            render_function: "render".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate; absent keys fall back to the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("component_base", &self.component_base),
            ("props_base", &self.props_base),
            ("state_base", &self.state_base),
            ("builder_receiver", &self.builder_receiver),
            ("element_builder", &self.element_builder),
            ("handler_type", &self.handler_type),
            ("construction_function", &self.construction_function),
            ("attrs_member", &self.attrs_member),
            ("state_init_function", &self.state_init_function),
            ("body_parameter", &self.body_parameter),
            ("render_function", &self.render_function),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName(key));
            }
        }
        Ok(())
    }

    pub fn is_reserved_prop(&self, name: &str) -> bool {
        self.reserved_props.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(r#"{ "construction_function": "mount" }"#).unwrap();
        assert_eq!(config.construction_function, "mount");
        assert_eq!(config.attrs_member, "attrs");
        assert!(config.is_reserved_prop("children"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = AnalysisConfig::from_json(r#"{ "attrs_member": "" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyName("attrs_member")));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "reserved_props": ["key"] }}"#).unwrap();
        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.reserved_props, vec!["key".to_string()]);
        assert!(!config.is_reserved_prop("children"));
    }

    #[test]
    fn test_from_missing_file_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = AnalysisConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
