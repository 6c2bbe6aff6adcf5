//! Configuration file support.
//!
//! Loads engine configuration from a TOML file. Every section is optional;
//! a missing `[schema]` section yields the stock table layout.
//!
//! ```toml
//! [schema]
//! table_prefix = "smw_fpt"
//! special_properties = ["_MDAT", "_REDI"]
//!
//! [schema.datatype_tables]
//! blob = "smw_di_blob"
//! wikipage = "smw_di_wikipage"
//!
//! [[schema.fixed_properties]]
//! key = "Population"
//! datatype = "number"
//!
//! [updates]
//! enable_update_jobs = false
//!
//! [logging]
//! level = "debug"
//!
//! [properties]
//! Population = "Number"
//! ```
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Environment variables (`SEMDB_ENABLE_UPDATE_JOBS`, `SEMDB_TABLE_PREFIX`)
//! 2. Config file
//! 3. Hardcoded defaults

use crate::error::{ApiError, Result};
use semdb_core::{TableMappingConfig, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use tracing::debug;

pub const ENV_ENABLE_UPDATE_JOBS: &str = "SEMDB_ENABLE_UPDATE_JOBS";
pub const ENV_TABLE_PREFIX: &str = "SEMDB_TABLE_PREFIX";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemdbConfig {
    /// Table layout `[schema]`
    #[serde(default)]
    pub schema: TableMappingConfig,

    /// Store update behavior `[updates]`
    #[serde(default)]
    pub updates: UpdatesConfig,

    /// Log setup `[logging]`
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Declared property datatypes `[properties]`: label → type label
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatesConfig {
    /// Defer store writes to update jobs
    #[serde(default = "default_true")]
    pub enable_update_jobs: bool,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            enable_update_jobs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when neither `RUST_LOG` nor `LOG_LEVEL` is set
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl SemdbConfig {
    /// Load a config file and apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ApiError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = if content.trim().is_empty() {
            Self::default()
        } else {
            toml::from_str(&content).map_err(|e| ApiError::Parse {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?
        };
        debug!(path = %path.display(), "config file loaded");
        config.apply_env()?;
        Ok(config)
    }

    /// Parse a TOML document without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ApiError::Parse {
            path: "<inline>".into(),
            detail: e.to_string(),
        })
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ENABLE_UPDATE_JOBS) {
            self.updates.enable_update_jobs = parse_bool(ENV_ENABLE_UPDATE_JOBS, &raw)?;
        }
        if let Some(prefix) = lookup(ENV_TABLE_PREFIX) {
            let prefix = prefix.trim();
            if prefix.is_empty() {
                return Err(ApiError::invalid_value(format!("{} is empty", ENV_TABLE_PREFIX)));
            }
            self.schema.table_prefix = prefix.to_string();
        }
        Ok(())
    }

    /// Resolve the `[properties]` section into type ids
    pub fn declared_properties(&self) -> Result<Vec<(&str, TypeId)>> {
        self.properties
            .iter()
            .map(|(label, type_label)| {
                TypeId::find(type_label)
                    .map(|type_id| (label.as_str(), type_id))
                    .ok_or_else(|| {
                        ApiError::invalid_value(format!(
                            "unknown datatype '{}' for property '{}'",
                            type_label, label
                        ))
                    })
            })
            .collect()
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ApiError::invalid_value(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semdb_vocab::tables;
    use std::collections::HashMap;

    #[test]
    fn test_empty_document_is_stock() {
        let config = SemdbConfig::from_toml_str("").unwrap();
        assert_eq!(config, SemdbConfig::default());
        assert!(config.updates.enable_update_jobs);
        assert_eq!(config.schema.table_prefix, tables::FIXED_PROPERTY_PREFIX);
        assert_eq!(config.schema.datatype_tables.len(), 6);
        assert_eq!(config.logging.format, LogFormat::Human);
    }

    #[test]
    fn test_sections() {
        let config = SemdbConfig::from_toml_str(
            r#"
            [schema]
            table_prefix = "t"
            special_properties = ["_MDAT"]

            [schema.datatype_tables]
            blob = "t_blob"

            [[schema.fixed_properties]]
            key = "Population"
            datatype = "number"

            [updates]
            enable_update_jobs = false

            [logging]
            level = "debug"
            format = "json"

            [properties]
            Population = "Number"
            "#,
        )
        .unwrap();
        assert_eq!(config.schema.table_prefix, "t");
        // An explicit section replaces the stock layout
        assert_eq!(config.schema.datatype_tables.len(), 1);
        assert_eq!(config.schema.fixed_properties[0].key, "Population");
        assert!(!config.updates.enable_update_jobs);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(
            config.declared_properties().unwrap(),
            vec![("Population", TypeId::Number)]
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENABLE_UPDATE_JOBS, "false"),
            (ENV_TABLE_PREFIX, "custom"),
        ]
        .into_iter()
        .collect();
        let mut config = SemdbConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert!(!config.updates.enable_update_jobs);
        assert_eq!(config.schema.table_prefix, "custom");
    }

    #[test]
    fn test_bad_override() {
        let mut config = SemdbConfig::default();
        let err = config
            .apply_overrides(|k| (k == ENV_ENABLE_UPDATE_JOBS).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_unknown_property_type() {
        let mut config = SemdbConfig::default();
        config.properties.insert("Population".into(), "Gibberish".into());
        assert!(config.declared_properties().unwrap_err().is_config());
    }

    #[test]
    fn test_parse_error() {
        let err = SemdbConfig::from_toml_str("[updates]\nenable_update_jobs = 3").unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }
}
