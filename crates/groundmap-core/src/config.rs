//! Pipeline configuration.
//!
//! Sources, lowest priority first: defaults, an optional JSON file, the
//! `GROUNDMAP_TABLE` / `GROUNDMAP_NAMES` environment variables, and finally
//! whatever the caller (usually CLI flags) sets afterwards.

use crate::bundle::{INDRA, UP};
use crate::error::{GroundingError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const TABLE_ENV: &str = "GROUNDMAP_TABLE";
pub const NAMES_ENV: &str = "GROUNDMAP_NAMES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroundmapConfig {
    /// Grounding table (tab-separated).
    pub table_path: Option<PathBuf>,
    /// Accession names for the primary namespace (tab-separated).
    pub names_path: Option<PathBuf>,
    /// Namespace used verbatim as the display name.
    pub preferred_namespace: String,
    /// Namespace whose identifiers are sent to the name resolver.
    pub primary_namespace: String,
    /// Memoize resolver lookups.
    pub cache_names: bool,
}

impl Default for GroundmapConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            names_path: None,
            preferred_namespace: INDRA.to_string(),
            primary_namespace: UP.to_string(),
            cache_names: true,
        }
    }
}

impl GroundmapConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GroundingError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| GroundingError::json(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults; then apply the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(p) = lookup(TABLE_ENV).filter(|v| !v.is_empty()) {
            self.table_path = Some(PathBuf::from(p));
        }
        if let Some(p) = lookup(NAMES_ENV).filter(|v| !v.is_empty()) {
            self.names_path = Some(PathBuf::from(p));
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.preferred_namespace.trim().is_empty() {
            return Err(GroundingError::Config(
                "preferred_namespace must not be empty".to_string(),
            ));
        }
        if self.primary_namespace.trim().is_empty() {
            return Err(GroundingError::Config(
                "primary_namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groundmap.json");
        fs::write(&path, r#"{"table_path": "grounding_map.tsv", "cache_names": false}"#).unwrap();

        let config = GroundmapConfig::from_file(&path).unwrap();
        assert_eq!(config.table_path, Some(PathBuf::from("grounding_map.tsv")));
        assert!(!config.cache_names);
        assert_eq!(config.primary_namespace, UP);
        assert_eq!(config.preferred_namespace, INDRA);
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = GroundmapConfig {
            table_path: Some(PathBuf::from("from_file.tsv")),
            ..Default::default()
        }
        .with_env_overrides(|key| match key {
            TABLE_ENV => Some("from_env.tsv".to_string()),
            NAMES_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.table_path, Some(PathBuf::from("from_env.tsv")));
        assert_eq!(config.names_path, None);
    }

    #[test]
    fn unknown_keys_and_empty_namespaces_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"tabel_path": "x.tsv"}"#).unwrap();
        assert!(matches!(
            GroundmapConfig::from_file(&path),
            Err(GroundingError::Json { .. })
        ));

        fs::write(&path, r#"{"primary_namespace": " "}"#).unwrap();
        assert!(matches!(
            GroundmapConfig::from_file(&path),
            Err(GroundingError::Config(_))
        ));
    }
}
