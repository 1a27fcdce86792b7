//! Command implementations for eea

pub mod export;
pub mod show;
pub mod validate;

pub use export::{export, ExportArgs};
pub use show::show;
pub use validate::validate;

use anyhow::{Context, Result};
use eea_core::{Architecture, ArchitectureDefinition, Violation};
use std::path::Path;
use tracing::{debug, info};

use crate::output::{OutputContext, ViolationRow};

/// Load a definition file, or the built-in platform when none is given
pub(crate) fn load_definition(path: Option<&Path>) -> Result<ArchitectureDefinition> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading definition");
            ArchitectureDefinition::from_file(path)
                .with_context(|| format!("Failed to load definition: {}", path.display()))
        }
        None => {
            debug!("No definition given, using the built-in platform");
            Ok(ArchitectureDefinition::steer_brake_by_wire())
        }
    }
}

pub(crate) fn build(definition: &ArchitectureDefinition) -> Result<Architecture> {
    definition
        .build()
        .with_context(|| format!("Failed to build architecture {}", definition.project))
}

/// Print validator findings as tables (table output only)
pub(crate) fn print_findings(violations: &[Violation], warnings: &[Violation], ctx: &OutputContext) {
    if !warnings.is_empty() {
        ctx.warn(&format!("{} warning(s)", warnings.len()));
        let rows: Vec<ViolationRow> = warnings.iter().map(ViolationRow::from).collect();
        ctx.print(&rows);
    }
    if !violations.is_empty() {
        ctx.error(&format!("{} violation(s)", violations.len()));
        let rows: Vec<ViolationRow> = violations.iter().map(ViolationRow::from).collect();
        ctx.print(&rows);
    }
}
