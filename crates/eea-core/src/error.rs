//! Error types for building and exporting architectures

use std::path::PathBuf;

use thiserror::Error;

use crate::models::PortKind;

/// Result type for architecture operations
pub type ArchResult<T> = Result<T, ArchError>;

/// Errors raised while building, loading or exporting an architecture
///
/// Build-time variants abort the build immediately: they describe a malformed
/// architecture description rather than a recoverable runtime condition.
#[derive(Debug, Error)]
pub enum ArchError {
    /// A name is already taken within its namespace
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// Port name matches no catalog pattern
    #[error("unrecognized port name: {0}")]
    UnrecognizedPortName(String),

    /// Software component not registered
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// Component/port reference does not resolve
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// Port exists but has the wrong kind for its use
    #[error("port kind mismatch on {port}: expected {expected}, found {actual}")]
    PortKindMismatch {
        port: String,
        expected: &'static str,
        actual: PortKind,
    },

    /// Component already placed on another ECU
    #[error("component {component} is already assigned to {assigned}, cannot assign to {requested}")]
    DoubleAssignment {
        component: String,
        assigned: String,
        requested: String,
    },

    /// Task bound to a component that has no ECU yet
    #[error("component {0} must be assigned to an ECU before it can be scheduled")]
    UnscheduledComponent(String),

    /// ECU not known to the assignment table
    #[error("unknown ECU: {0}")]
    UnknownEcu(String),

    /// Signal not present in the signal graph
    #[error("unknown signal: {0}")]
    UnknownSignal(String),

    /// Task priority outside the accepted range
    #[error("invalid priority {priority} for task {task}: priorities start at 1")]
    InvalidPriority { task: String, priority: u32 },

    /// Export backend rejected the model or failed to persist it
    #[error("export of project {project} failed{}: {message}", display_path(.path))]
    Export {
        project: String,
        path: Option<PathBuf>,
        message: String,
    },

    /// Definition file is structurally invalid
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArchError {
    /// Build an export error for a project
    pub fn export(
        project: impl Into<String>,
        path: Option<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        ArchError::Export {
            project: project.into(),
            path,
            message: message.into(),
        }
    }

    /// Whether this error came from the export boundary rather than the build
    pub fn is_export(&self) -> bool {
        matches!(self, ArchError::Export { .. })
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}
