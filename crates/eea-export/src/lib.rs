//! eea-export - Export backends for validated E/E architectures
//!
//! Two backends implement [`eea_core::ExportBackend`]:
//! - [`FileExportBackend`] writes each project as a JSON or YAML document
//!   under a root directory
//! - [`MockExportBackend`] keeps exports in memory for tests
//!
//! # Example
//!
//! ```ignore
//! use eea_core::{export_architecture, ArchitectureDefinition};
//! use eea_export::{create_backend, ExportConfig};
//!
//! let definition = ArchitectureDefinition::steer_brake_by_wire();
//! let snapshot = definition.validator().validate(&definition.build()?)?;
//! let backend = create_backend(&ExportConfig::default());
//! let receipt = export_architecture(backend.as_ref(), "UltimateSteerBrakeByWire", &snapshot).await?;
//! ```

pub mod config;
pub mod file;
pub mod mock;

pub use config::{ExportConfig, ExportFormat, FileConfig, MockConfig};
pub use file::FileExportBackend;
pub use mock::{ExportRecord, MockExportBackend};

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use eea_core::{ArchError, ExportBackend};

/// Create an export backend based on configuration
pub fn create_backend(config: &ExportConfig) -> Arc<dyn ExportBackend> {
    match config {
        ExportConfig::File(cfg) => Arc::new(FileExportBackend::new(cfg)),
        ExportConfig::Mock(cfg) => Arc::new(MockExportBackend::new(cfg)),
    }
}

/// Snapshot rendering failures are export failures of that project and path
pub(crate) fn serialization_error(project: &str, path: &Path, err: impl Display) -> ArchError {
    ArchError::export(
        project,
        Some(path.to_path_buf()),
        format!("serialization failed: {}", err),
    )
}
