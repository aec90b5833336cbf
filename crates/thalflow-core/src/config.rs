use crate::values::{EnvVar, Value};
use crate::{IrError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs of the dependency analysis. Every field has a default, so a JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Environment variables that count as untrusted input.
    pub generic_taint: Vec<EnvVar>,
    /// Modifier names whose presence marks a function as access controlled.
    pub protecting_modifiers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            generic_taint: vec![
                EnvVar::MsgSender,
                EnvVar::MsgValue,
                EnvVar::MsgData,
                EnvVar::TxOrigin,
                EnvVar::TxGasPrice,
            ],
            protecting_modifiers: vec!["onlyOwner".to_string()],
        }
    }
}

impl AnalysisConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| IrError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| IrError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| IrError::Config(e.to_string()))
    }

    pub fn is_generic_taint(&self, value: &Value) -> bool {
        match value {
            Value::Env(var) => self.generic_taint.contains(var),
            _ => false,
        }
    }

    pub fn is_protecting_modifier(&self, name: &str) -> bool {
        self.protecting_modifiers.iter().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.is_generic_taint(&Value::Env(EnvVar::MsgSender)));
        assert!(config.is_generic_taint(&Value::Env(EnvVar::TxGasPrice)));
        assert!(!config.is_generic_taint(&Value::Env(EnvVar::BlockTimestamp)));
        assert!(config.is_protecting_modifier("onlyOwner"));
        assert!(!config.is_protecting_modifier("nonReentrant"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(r#"{"protecting_modifiers": ["onlyAdmin"]}"#)
            .unwrap();
        assert_eq!(config.protecting_modifiers, vec!["onlyAdmin".to_string()]);
        assert_eq!(
            config.generic_taint,
            AnalysisConfig::default().generic_taint
        );
    }

    #[test]
    fn test_env_names_in_json() {
        let config = AnalysisConfig::from_json(r#"{"generic_taint": ["tx.origin"]}"#).unwrap();
        assert_eq!(config.generic_taint, vec![EnvVar::TxOrigin]);

        let round = AnalysisConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(round, config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = AnalysisConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, IrError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thalflow.json");
        std::fs::write(&path, r#"{"generic_taint": ["msg.value"]}"#).unwrap();

        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.generic_taint, vec![EnvVar::MsgValue]);
        assert!(config.is_protecting_modifier("onlyOwner"));

        let missing = AnalysisConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, IrError::Config(_)));
    }
}
