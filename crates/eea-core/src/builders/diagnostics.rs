//! UDS diagnostics binder

use std::collections::BTreeSet;

use tracing::info;

use super::{ComponentRegistry, EcuAssignment};
use crate::error::{ArchError, ArchResult};
use crate::models::{PortKind, UdsService};
use crate::refs::PortRef;

/// Default name of the UDS configuration
pub const DEFAULT_UDS: &str = "AdvancedUDS";

#[derive(Debug, Clone)]
pub struct DiagnosticsBinder {
    name: String,
    services: Vec<UdsService>,
}

impl Default for DiagnosticsBinder {
    fn default() -> Self {
        Self::new(DEFAULT_UDS)
    }
}

impl DiagnosticsBinder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            services: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind a request/response pair of Diagnostic ports to serving ECUs
    pub fn bind_uds_service<I, S>(
        &mut self,
        registry: &ComponentRegistry,
        assignment: &EcuAssignment,
        request: PortRef,
        response: PortRef,
        ecus: I,
    ) -> ArchResult<&UdsService>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for port in [&request, &response] {
            let resolved = registry.resolve_port(port)?;
            if resolved.kind != PortKind::Diagnostic {
                return Err(ArchError::PortKindMismatch {
                    port: port.to_string(),
                    expected: "Diagnostic",
                    actual: resolved.kind,
                });
            }
        }

        let ecus: BTreeSet<String> = ecus.into_iter().map(Into::into).collect();
        if let Some(unknown) = ecus.iter().find(|e| !assignment.contains_ecu(e)) {
            return Err(ArchError::UnknownEcu(unknown.clone()));
        }

        info!(
            uds = %self.name,
            %request,
            %response,
            ecus = ?ecus,
            "Bound UDS service"
        );
        self.services.push(UdsService {
            request,
            response,
            ecus,
        });
        Ok(&self.services[self.services.len() - 1])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UdsService> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
