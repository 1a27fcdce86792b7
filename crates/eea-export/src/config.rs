//! Export backend configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which backend to export through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportConfig {
    /// JSON/YAML documents on the local filesystem
    File(FileConfig),
    /// In-memory backend for testing
    Mock(MockConfig),
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::File(FileConfig::default())
    }
}

/// Filesystem backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory that project directories are created under
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub format: ExportFormat,
    /// Replace an existing export instead of failing
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            format: ExportFormat::default(),
            overwrite: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("export")
}

/// Document format written by the filesystem backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Mock backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Reject every export with an error
    #[serde(default)]
    pub reject_exports: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_file_config() {
        let config: ExportConfig = toml::from_str(
            r#"
type = "file"
root = "/tmp/eea"
format = "yaml"
"#,
        )
        .unwrap();

        match config {
            ExportConfig::File(cfg) => {
                assert_eq!(cfg.root, PathBuf::from("/tmp/eea"));
                assert_eq!(cfg.format, ExportFormat::Yaml);
                assert!(!cfg.overwrite);
            }
            other => panic!("Expected File config, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_mock_config_defaults() {
        let config: ExportConfig = toml::from_str(r#"type = "mock""#).unwrap();
        assert_eq!(config, ExportConfig::Mock(MockConfig::default()));
    }

    #[test]
    fn test_default_is_json_file_export() {
        match ExportConfig::default() {
            ExportConfig::File(cfg) => {
                assert_eq!(cfg.format.extension(), "json");
                assert_eq!(cfg.root, PathBuf::from("export"));
            }
            other => panic!("Expected File config, got {:?}", other),
        }
    }
}
