//! In-memory export backend for testing

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use eea_core::{ArchError, ArchResult, ExportBackend, ProjectHandle, ValidatedArchitecture};

use crate::config::MockConfig;

/// One export captured by the mock backend
#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub project: String,
    pub path: PathBuf,
    /// The snapshot as it would have been serialized
    pub document: serde_json::Value,
}

#[derive(Default)]
struct Shared {
    records: RwLock<Vec<ExportRecord>>,
    open_handles: AtomicUsize,
    opened_total: AtomicUsize,
    reject_exports: AtomicBool,
}

/// Mock export backend
///
/// Clones share state, so a test can keep one clone for inspection while the
/// other is handed to the code under test.
#[derive(Clone, Default)]
pub struct MockExportBackend {
    shared: Arc<Shared>,
}

impl MockExportBackend {
    pub fn new(config: &MockConfig) -> Self {
        let backend = Self::default();
        backend.set_reject_exports(config.reject_exports);
        backend
    }

    /// Make every subsequent export fail
    pub fn set_reject_exports(&self, reject: bool) {
        self.shared.reject_exports.store(reject, Ordering::SeqCst);
    }

    pub fn exports(&self) -> Vec<ExportRecord> {
        self.shared.records.read().clone()
    }

    pub fn export_count(&self) -> usize {
        self.shared.records.read().len()
    }

    /// Handles created but not yet closed
    pub fn open_handles(&self) -> usize {
        self.shared.open_handles.load(Ordering::SeqCst)
    }

    pub fn projects_opened(&self) -> usize {
        self.shared.opened_total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExportBackend for MockExportBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_project(&self, name: &str) -> ArchResult<Box<dyn ProjectHandle>> {
        self.shared.open_handles.fetch_add(1, Ordering::SeqCst);
        self.shared.opened_total.fetch_add(1, Ordering::SeqCst);
        debug!(project = %name, "Opened mock project");
        Ok(Box::new(MockProjectHandle {
            name: name.to_string(),
            shared: self.shared.clone(),
        }))
    }
}

struct MockProjectHandle {
    name: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl ProjectHandle for MockProjectHandle {
    fn project_name(&self) -> &str {
        &self.name
    }

    async fn export_architecture(&mut self, snapshot: &ValidatedArchitecture) -> ArchResult<PathBuf> {
        let path = PathBuf::from(format!("mock://{}/{}.json", self.name, self.name));
        if self.shared.reject_exports.load(Ordering::SeqCst) {
            return Err(ArchError::export(&self.name, Some(path), "mock backend rejects exports"));
        }

        let document = serde_json::to_value(snapshot)
            .map_err(|e| crate::serialization_error(&self.name, &path, e))?;
        self.shared.records.write().push(ExportRecord {
            project: self.name.clone(),
            path: path.clone(),
            document,
        });
        info!(project = %self.name, "Recorded mock export");
        Ok(path)
    }

    async fn close(self: Box<Self>) -> ArchResult<()> {
        self.shared.open_handles.fetch_sub(1, Ordering::SeqCst);
        debug!(project = %self.name, "Closed mock project");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eea_core::{export_architecture, ArchitectureDefinition};
    use pretty_assertions::assert_eq;

    fn snapshot() -> ValidatedArchitecture {
        let definition = ArchitectureDefinition::steer_brake_by_wire();
        let arch = definition.build().unwrap();
        definition.validator().validate(&arch).unwrap()
    }

    #[tokio::test]
    async fn test_records_export() {
        let backend = MockExportBackend::default();
        let receipt = export_architecture(&backend, "SBW", &snapshot()).await.unwrap();

        assert_eq!(receipt.backend, "mock");
        assert_eq!(backend.export_count(), 1);
        assert_eq!(backend.open_handles(), 0);

        let record = &backend.exports()[0];
        assert_eq!(record.project, "SBW");
        assert_eq!(record.document["tasks"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_rejected_export_releases_handle() {
        let backend = MockExportBackend::new(&MockConfig { reject_exports: true });
        let err = export_architecture(&backend, "SBW", &snapshot()).await.unwrap_err();

        assert!(err.is_export());
        assert_eq!(backend.export_count(), 0);
        assert_eq!(backend.projects_opened(), 1);
        assert_eq!(backend.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let backend = MockExportBackend::default();
        let observer = backend.clone();

        export_architecture(&backend, "A", &snapshot()).await.unwrap();
        backend.set_reject_exports(true);
        assert!(export_architecture(&backend, "B", &snapshot()).await.is_err());

        assert_eq!(observer.export_count(), 1);
        assert_eq!(observer.projects_opened(), 2);
    }
}
