//! Validate command - build and check an architecture

use anyhow::{bail, Result};
use std::path::Path;

use crate::output::OutputContext;

/// Build the definition and report every violation and warning
pub fn validate(definition: Option<&Path>, ctx: &OutputContext) -> Result<()> {
    let definition = super::load_definition(definition)?;
    let arch = super::build(&definition)?;
    let report = definition.validator().check(&arch);

    if ctx.is_json() {
        ctx.print_json(&report);
    } else {
        super::print_findings(&report.violations, &report.warnings, ctx);
    }

    if !report.is_ok() {
        bail!(
            "{} failed validation with {} violation(s)",
            definition.project,
            report.violations.len()
        );
    }

    if !ctx.is_json() {
        ctx.success(&format!(
            "{} is valid ({} components, {} signals, {} ECUs, {} tasks)",
            definition.project,
            arch.components().len(),
            arch.signals().len(),
            arch.ecus().len(),
            arch.scheduler().len()
        ));
    }
    Ok(())
}
