//! eea-core - Core model and validation for vehicle E/E architectures
//!
//! This crate holds the in-memory architecture model of a steer-by-wire and
//! brake-by-wire platform (software components, signals, PDUs, ECUs, tasks,
//! safe states and UDS bindings), the builders that assemble it in dependency
//! order, and the validator that turns a finished model into an immutable
//! [`ValidatedArchitecture`] ready for export.
//!
//! # Architecture
//!
//! ```text
//! Catalog ─► ComponentRegistry ─┬─► SignalGraph ─► StackConfigurator ─► SecurityConfigurator
//!                               ├─► EcuAssignment ─┬─► Scheduler
//!                               │                  └─► DiagnosticsBinder
//!                               └─► SafetyManager
//!
//!                  Architecture ─► ArchitectureValidator ─► ValidatedArchitecture ─► ExportBackend
//! ```

pub mod architecture;
pub mod backend;
pub mod builders;
pub mod catalog;
pub mod definition;
pub mod error;
pub mod models;
pub mod refs;
pub mod validator;

pub use architecture::{Architecture, ValidatedArchitecture};
pub use backend::{export_architecture, ExportBackend, ExportReceipt, ProjectHandle};
pub use builders::{
    ComponentRegistry, DiagnosticsBinder, EcuAssignment, SafetyManager, Scheduler,
    SecurityConfigurator, SignalGraph, StackConfigurator,
};
pub use catalog::{Catalog, PortPattern};
pub use definition::ArchitectureDefinition;
pub use error::{ArchError, ArchResult};
pub use models::*;
pub use refs::PortRef;
pub use validator::{
    ArchitectureValidator, SchedulingPolicy, ValidationReport, Violation, ViolationKind,
};
