//! Generator configuration loading from YAML files
//!
//! Everything that changes the shape of the generated collection lives here
//! instead of being hardcoded in the emitter. `GeneratorConfig::default()`
//! reproduces the historical layout.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Configuration format version understood by this build
pub const CONFIG_VERSION: u32 = 1;

/// Output layout version understood by this build
pub const LAYOUT_VERSION: u32 = 1;

/// Root structure for generator configuration YAML files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Configuration format version
    pub version: u32,
    /// How operations are grouped into files
    #[serde(default)]
    pub layout: OutputLayout,
    /// Identifier normalization settings
    #[serde(default)]
    pub naming: NamingConfig,
    /// Parameter names rendered with `no_log`
    #[serde(default = "default_no_log_parameters")]
    pub no_log_parameters: Vec<String>,
    /// Static documentation fields for every module
    #[serde(default)]
    pub module: ModuleInfo,
}

/// Versioned grouping policy consumed by the module emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputLayout {
    pub version: u32,
    pub grouping: GroupingPolicy,
}

/// One module per resource (entry point per action) or one per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    PerResource,
    PerOperation,
}

/// Identifier normalization settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamingConfig {
    /// Leading path segments dropped before deriving resource names
    #[serde(default = "default_strip_path_prefixes")]
    pub strip_path_prefixes: Vec<String>,
    /// Extra identifiers to avoid, on top of the built-in reserved words
    #[serde(default)]
    pub reserved_words: Vec<String>,
}

/// Static documentation fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleInfo {
    #[serde(default)]
    pub author: Vec<String>,
    #[serde(default = "default_version_added")]
    pub version_added: String,
    #[serde(default = "default_requirements")]
    pub requirements: Vec<String>,
}

fn default_no_log_parameters() -> Vec<String> {
    vec![
        "password".to_string(),
        "user_name".to_string(),
        "username".to_string(),
    ]
}

fn default_strip_path_prefixes() -> Vec<String> {
    vec!["data".to_string()]
}

fn default_version_added() -> String {
    "1.0.0".to_string()
}

fn default_requirements() -> Vec<String> {
    vec!["python >= 3.6".to_string()]
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            layout: OutputLayout::default(),
            naming: NamingConfig::default(),
            no_log_parameters: default_no_log_parameters(),
            module: ModuleInfo::default(),
        }
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION,
            grouping: GroupingPolicy::PerResource,
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_path_prefixes: default_strip_path_prefixes(),
            reserved_words: Vec::new(),
        }
    }
}

impl Default for ModuleInfo {
    fn default() -> Self {
        Self {
            author: Vec::new(),
            version_added: default_version_added(),
            requirements: default_requirements(),
        }
    }
}

impl GroupingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerResource => "per_resource",
            Self::PerOperation => "per_operation",
        }
    }
}

impl fmt::Display for GroupingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            GeneratorError::Config(msg) => {
                GeneratorError::Config(format!("{} (in {:?})", msg, path))
            }
            other => other,
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse config YAML: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject versions this build cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(GeneratorError::Config(format!(
                "Unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }
        if self.layout.version != LAYOUT_VERSION {
            return Err(GeneratorError::Config(format!(
                "Unsupported layout version {} (expected {})",
                self.layout.version, LAYOUT_VERSION
            )));
        }
        Ok(())
    }

    /// Same configuration with a different grouping policy
    pub fn with_grouping(mut self, grouping: GroupingPolicy) -> Self {
        self.layout.grouping = grouping;
        self
    }

    /// Whether a parameter must be rendered with `no_log`
    pub fn is_no_log(&self, parameter: &str) -> bool {
        self.no_log_parameters.iter().any(|p| p == parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_historical_layout() {
        let config = GeneratorConfig::default();
        assert_eq!(config.layout.grouping, GroupingPolicy::PerResource);
        assert_eq!(config.naming.strip_path_prefixes, vec!["data"]);
        assert!(config.is_no_log("password"));
        assert!(!config.is_no_log("name"));
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = GeneratorConfig::from_yaml_str("version: 1\n").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
version: 1
layout:
  version: 1
  grouping: per_operation
naming:
  strip_path_prefixes: []
  reserved_words: [session]
no_log_parameters: [secret]
module:
  author: [Jane Doe]
  version_added: "2.1.0"
"#;
        let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.layout.grouping, GroupingPolicy::PerOperation);
        assert!(config.naming.strip_path_prefixes.is_empty());
        assert_eq!(config.naming.reserved_words, vec!["session"]);
        assert!(config.is_no_log("secret"));
        assert_eq!(config.module.version_added, "2.1.0");
        assert_eq!(config.module.requirements, vec!["python >= 3.6"]);
    }

    #[test]
    fn test_rejects_unknown_layout_version() {
        let yaml = "version: 1\nlayout:\n  version: 7\n  grouping: per_resource\n";
        let err = GeneratorConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("layout version 7"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "version: 1\nlayout:\n  version: 1\n  grouping: per_operation").unwrap();
        let config = GeneratorConfig::load(file.path()).unwrap();
        assert_eq!(config.layout.grouping, GroupingPolicy::PerOperation);
    }
}
