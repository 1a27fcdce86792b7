//! Export backend traits - the seam between a validated model and the tool
//! that persists it

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::architecture::ValidatedArchitecture;
use crate::error::ArchResult;

/// A destination for validated architectures
///
/// Implementations own their naming and storage rules. Only validated
/// snapshots cross this boundary.
#[async_trait]
pub trait ExportBackend: Send + Sync {
    /// Short backend name for logs and receipts
    fn name(&self) -> &str;

    /// Open (or create) the project that exports are written into
    async fn create_project(&self, name: &str) -> ArchResult<Box<dyn ProjectHandle>>;
}

/// An open project inside an export backend
#[async_trait]
pub trait ProjectHandle: Send {
    fn project_name(&self) -> &str;

    /// Persist the snapshot, returning where it was written
    ///
    /// Fails with [`ArchError::Export`](crate::ArchError::Export) when the
    /// backend rejects the model.
    async fn export_architecture(&mut self, snapshot: &ValidatedArchitecture) -> ArchResult<PathBuf>;

    /// Release the project. Must be called on every exit path.
    async fn close(self: Box<Self>) -> ArchResult<()>;
}

/// Record of a completed export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub project: String,
    pub backend: String,
    pub path: PathBuf,
    pub export_id: Uuid,
    pub exported_at: DateTime<Utc>,
}

/// Open a project, export the snapshot into it and close it again
///
/// The handle is closed whether or not the export succeeded. An export error
/// takes precedence over a close error; a close error after a failed export
/// is only logged.
pub async fn export_architecture(
    backend: &dyn ExportBackend,
    project: &str,
    snapshot: &ValidatedArchitecture,
) -> ArchResult<ExportReceipt> {
    info!(backend = %backend.name(), %project, "Opening export project");
    let mut handle = backend.create_project(project).await?;

    let exported = handle.export_architecture(snapshot).await;
    let closed = handle.close().await;

    let path = match (exported, closed) {
        (Ok(path), Ok(())) => path,
        (Ok(_), Err(close_err)) => return Err(close_err),
        (Err(export_err), Ok(())) => return Err(export_err),
        (Err(export_err), Err(close_err)) => {
            warn!(%project, error = %close_err, "Closing project after failed export also failed");
            return Err(export_err);
        }
    };

    let receipt = ExportReceipt {
        project: project.to_string(),
        backend: backend.name().to_string(),
        path,
        export_id: Uuid::new_v4(),
        exported_at: Utc::now(),
    };
    info!(
        %project,
        path = %receipt.path.display(),
        export_id = %receipt.export_id,
        "Architecture exported"
    );
    Ok(receipt)
}
