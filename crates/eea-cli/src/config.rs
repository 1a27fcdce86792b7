//! Configuration file handling for eea

use anyhow::{Context, Result};
use eea_export::ExportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Definition used when none is given on the command line
    pub definition: Option<PathBuf>,
    /// Default output format
    pub format: Option<OutputFormat>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Export backend
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("eea");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        definition: Option<&Path>,
        format: Option<OutputFormat>,
        no_color: bool,
    ) -> MergedConfig {
        MergedConfig {
            definition: definition
                .map(Path::to_path_buf)
                .or_else(|| self.definition.clone()),
            format: format.or(self.format).unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
            export: self.export.clone(),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub definition: Option<PathBuf>,
    pub format: OutputFormat,
    pub no_color: bool,
    pub export: ExportConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eea_export::{ExportFormat, FileConfig};
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
definition = "arch.toml"
format = "json"

[export]
type = "file"
root = "out"
format = "yaml"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.definition, Some(PathBuf::from("arch.toml")));
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(
            config.export,
            ExportConfig::File(FileConfig {
                root: PathBuf::from("out"),
                format: ExportFormat::Yaml,
                overwrite: false,
            })
        );
    }

    #[test]
    fn test_args_override_config() {
        let config = Config {
            definition: Some(PathBuf::from("from-config.toml")),
            format: Some(OutputFormat::Json),
            no_color: Some(true),
            export: ExportConfig::default(),
        };

        let merged = config.merge_with_args(Some(Path::new("cli.yaml")), Some(OutputFormat::Table), false);
        assert_eq!(merged.definition, Some(PathBuf::from("cli.yaml")));
        assert_eq!(merged.format, OutputFormat::Table);
        assert!(merged.no_color);

        let merged = Config::default().merge_with_args(None, None, false);
        assert_eq!(merged.definition, None);
        assert_eq!(merged.format, OutputFormat::Table);
        assert!(!merged.no_color);
    }
}
