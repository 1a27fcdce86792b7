//! Filesystem export backend
//!
//! Layout: `<root>/<project>/<project>.<json|yaml>`. One document per
//! project; re-exporting requires `overwrite`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use eea_core::{ArchError, ArchResult, ExportBackend, ProjectHandle, ValidatedArchitecture};

use crate::config::{ExportFormat, FileConfig};

/// Writes validated architectures as documents on disk
#[derive(Debug, Clone)]
pub struct FileExportBackend {
    root: PathBuf,
    format: ExportFormat,
    overwrite: bool,
}

impl FileExportBackend {
    pub fn new(config: &FileConfig) -> Self {
        Self {
            root: config.root.clone(),
            format: config.format,
            overwrite: config.overwrite,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }
}

/// Project names become directory and file names, so they must be a single
/// plain path component.
fn check_project_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("project name is empty".to_string());
    }
    if name.starts_with('.') {
        return Err(format!("project name {:?} starts with '.'", name));
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(format!("project name {:?} contains a path character", name));
    }
    Ok(())
}

/// The backend stores names case-insensitively; two names differing only in
/// case cannot coexist.
fn check_case_collisions<'a>(
    kind: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), String> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for name in names {
        if let Some(previous) = seen.insert(name.to_lowercase(), name) {
            return Err(format!(
                "{} names {} and {} collide case-insensitively",
                kind, previous, name
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl ExportBackend for FileExportBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn create_project(&self, name: &str) -> ArchResult<Box<dyn ProjectHandle>> {
        check_project_name(name).map_err(|message| ArchError::export(name, None, message))?;

        // Created on first write
        let dir = self.root.join(name);
        info!(project = %name, dir = %dir.display(), "Opened file export project");
        Ok(Box::new(FileProjectHandle {
            name: name.to_string(),
            dir,
            format: self.format,
            overwrite: self.overwrite,
        }))
    }
}

struct FileProjectHandle {
    name: String,
    dir: PathBuf,
    format: ExportFormat,
    overwrite: bool,
}

impl FileProjectHandle {
    fn fail(&self, path: &Path, message: impl Into<String>) -> ArchError {
        ArchError::export(&self.name, Some(path.to_path_buf()), message)
    }

    fn render(&self, snapshot: &ValidatedArchitecture, path: &Path) -> ArchResult<String> {
        let rendered = match self.format {
            ExportFormat::Json => serde_json::to_string_pretty(snapshot).map_err(|e| e.to_string()),
            ExportFormat::Yaml => serde_yaml::to_string(snapshot).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| crate::serialization_error(&self.name, path, message))
    }
}

#[async_trait]
impl ProjectHandle for FileProjectHandle {
    fn project_name(&self) -> &str {
        &self.name
    }

    async fn export_architecture(&mut self, snapshot: &ValidatedArchitecture) -> ArchResult<PathBuf> {
        let path = self
            .dir
            .join(format!("{}.{}", self.name, self.format.extension()));

        check_case_collisions("component", snapshot.components().iter().map(|c| c.name.as_str()))
            .and_then(|_| {
                check_case_collisions("signal", snapshot.signals().iter().map(|s| s.name.as_str()))
            })
            .map_err(|message| self.fail(&path, message))?;

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| self.fail(&path, e.to_string()))?;
        if exists && !self.overwrite {
            return Err(self.fail(&path, "output file already exists"));
        }

        let document = self.render(snapshot, &path)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| self.fail(&path, e.to_string()))?;
        tokio::fs::write(&path, document)
            .await
            .map_err(|e| self.fail(&path, e.to_string()))?;

        info!(
            project = %self.name,
            path = %path.display(),
            format = %self.format,
            components = snapshot.components().len(),
            signals = snapshot.signals().len(),
            "Wrote architecture"
        );
        Ok(path)
    }

    async fn close(self: Box<Self>) -> ArchResult<()> {
        debug!(project = %self.name, "Closed file export project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eea_core::{export_architecture, Architecture, ArchitectureDefinition, ArchitectureValidator};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn backend(root: &Path, format: ExportFormat, overwrite: bool) -> FileExportBackend {
        FileExportBackend::new(&FileConfig {
            root: root.to_path_buf(),
            format,
            overwrite,
        })
    }

    fn snapshot() -> ValidatedArchitecture {
        let definition = ArchitectureDefinition::steer_brake_by_wire();
        let arch = definition.build().unwrap();
        definition.validator().validate(&arch).unwrap()
    }

    #[tokio::test]
    async fn test_export_json() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(tmp.path(), ExportFormat::Json, false);

        let receipt = export_architecture(&backend, "SBW", &snapshot()).await.unwrap();
        assert_eq!(receipt.path, tmp.path().join("SBW").join("SBW.json"));

        let content = std::fs::read_to_string(&receipt.path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["project"], "UltimateSteerBrakeByWire");
        assert_eq!(doc["components"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_export_yaml() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(tmp.path(), ExportFormat::Yaml, false);

        let receipt = export_architecture(&backend, "SBW", &snapshot()).await.unwrap();
        assert_eq!(receipt.path.extension().unwrap(), "yaml");

        let content = std::fs::read_to_string(&receipt.path).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(doc["ecus"].as_sequence().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_existing_file_requires_overwrite() {
        let tmp = TempDir::new().unwrap();
        let snapshot = snapshot();

        let strict = backend(tmp.path(), ExportFormat::Json, false);
        export_architecture(&strict, "SBW", &snapshot).await.unwrap();

        match export_architecture(&strict, "SBW", &snapshot).await {
            Err(ArchError::Export { path, message, .. }) => {
                assert_eq!(path, Some(tmp.path().join("SBW").join("SBW.json")));
                assert!(message.contains("already exists"));
            }
            other => panic!("Expected Export error, got {:?}", other),
        }

        let relaxed = backend(tmp.path(), ExportFormat::Json, true);
        assert!(export_architecture(&relaxed, "SBW", &snapshot).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_path_like_project_names() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(tmp.path(), ExportFormat::Json, false);

        for name in ["", "  ", "../escape", "a/b", ".hidden"] {
            let err = backend.create_project(name).await.err().unwrap();
            assert!(err.is_export(), "{:?} should be rejected", name);
        }
    }

    #[tokio::test]
    async fn test_rejects_case_colliding_components() {
        let mut arch = Architecture::new("Collide");
        arch.add_component("SensorFusion", ["ProcessedSensorOutput"]).unwrap();
        arch.add_component("sensorfusion", ["RawSensorInput"]).unwrap();
        arch.assign("FusionECU", "SensorFusion").unwrap();
        arch.assign("FusionECU", "sensorfusion").unwrap();
        let snapshot = ArchitectureValidator::default().validate(&arch).unwrap();

        let tmp = TempDir::new().unwrap();
        let backend = backend(tmp.path(), ExportFormat::Json, false);
        let err = export_architecture(&backend, "Collide", &snapshot).await.unwrap_err();

        assert!(err.is_export());
        assert!(err.to_string().contains("collide"));
        assert!(!tmp.path().join("Collide").exists());
    }

    #[tokio::test]
    async fn test_project_directory_created_on_write() {
        let tmp = TempDir::new().unwrap();
        let backend = backend(tmp.path(), ExportFormat::Json, false);

        let handle = backend.create_project("Lazy").await.unwrap();
        assert_eq!(handle.project_name(), "Lazy");
        handle.close().await.unwrap();
        assert!(!tmp.path().join("Lazy").exists());

        export_architecture(&backend, "Lazy", &snapshot()).await.unwrap();
        assert!(tmp.path().join("Lazy").join("Lazy.json").exists());
    }
}
