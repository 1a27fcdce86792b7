//! Export command - build, validate and hand the snapshot to a backend

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use eea_core::export_architecture;
use eea_export::{create_backend, ExportConfig, ExportFormat};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output::OutputContext;

/// Document format for file export
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl From<DocumentFormat> for ExportFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Json => ExportFormat::Json,
            DocumentFormat::Yaml => ExportFormat::Yaml,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Project name (defaults to the definition's project)
    #[arg(long)]
    pub project: Option<String>,

    /// Root directory for file export
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document format for file export
    #[arg(long, value_enum)]
    pub export_format: Option<DocumentFormat>,

    /// Replace an existing export
    #[arg(long)]
    pub overwrite: bool,
}

impl ExportArgs {
    /// Apply command-line overrides to the configured backend
    ///
    /// Overrides only affect the file backend.
    fn apply(&self, base: &ExportConfig) -> ExportConfig {
        match base {
            ExportConfig::File(cfg) => {
                let mut cfg = cfg.clone();
                if let Some(root) = &self.output {
                    cfg.root = root.clone();
                }
                if let Some(format) = self.export_format {
                    cfg.format = format.into();
                }
                cfg.overwrite |= self.overwrite;
                ExportConfig::File(cfg)
            }
            other => other.clone(),
        }
    }
}

/// Export a validated architecture
pub async fn export(
    definition: Option<&Path>,
    config: &ExportConfig,
    args: &ExportArgs,
    ctx: &OutputContext,
) -> Result<()> {
    let definition = super::load_definition(definition)?;
    let arch = super::build(&definition)?;

    let snapshot = match definition.validator().validate(&arch) {
        Ok(snapshot) => snapshot,
        Err(violations) => {
            if ctx.is_json() {
                ctx.print_json(&violations);
            } else {
                super::print_findings(&violations, &[], ctx);
            }
            bail!(
                "{} failed validation with {} violation(s); nothing exported",
                definition.project,
                violations.len()
            );
        }
    };
    if !ctx.is_json() {
        super::print_findings(&[], snapshot.warnings(), ctx);
    }

    let project = args.project.as_deref().unwrap_or(&definition.project);
    let backend = create_backend(&args.apply(config));
    info!(%project, backend = %backend.name(), "Exporting architecture");
    let receipt = export_architecture(backend.as_ref(), project, &snapshot)
        .await
        .with_context(|| format!("Failed to export {}", project))?;

    if ctx.is_json() {
        ctx.print_json(&receipt);
        return Ok(());
    }

    ctx.success(&format!("Exported {}", receipt.project));
    ctx.print_kv(&[
        ("Backend", receipt.backend.clone()),
        ("Path", receipt.path.display().to_string()),
        ("Export ID", receipt.export_id.to_string()),
        ("Exported at", receipt.exported_at.to_rfc3339()),
    ]);
    Ok(())
}
