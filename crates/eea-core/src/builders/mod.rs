//! Build-phase components
//!
//! Each builder owns one slice of the model and borrows the builders it
//! depends on when resolving references, so the build order is visible in
//! the signatures: a [`Scheduler`] cannot accept a task without an
//! [`EcuAssignment`] to check placement against.

mod assignment;
mod diagnostics;
mod registry;
mod safety;
mod scheduler;
mod security;
mod signal_graph;
mod stack;

pub use assignment::EcuAssignment;
pub use diagnostics::{DiagnosticsBinder, DEFAULT_UDS};
pub use registry::ComponentRegistry;
pub use safety::{SafetyManager, DEFAULT_SAFETY_MANAGER};
pub use scheduler::{Scheduler, SlotConflict};
pub use security::{SecurityConfigurator, DEFAULT_CRYPTO_STACK};
pub use signal_graph::SignalGraph;
pub use stack::{StackConfigurator, DEFAULT_COM_STACK};
