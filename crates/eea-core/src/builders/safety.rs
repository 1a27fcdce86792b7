//! Safe state manager - fallback values for actuator outputs

use tracing::{info, warn};

use super::ComponentRegistry;
use crate::error::{ArchError, ArchResult};
use crate::models::{PortKind, SafeState};
use crate::refs::PortRef;

/// Default name of the safe state manager
pub const DEFAULT_SAFETY_MANAGER: &str = "UltimateSafetyManager";

#[derive(Debug, Clone)]
pub struct SafetyManager {
    name: String,
    states: Vec<SafeState>,
}

impl Default for SafetyManager {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_MANAGER)
    }
}

impl SafetyManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define the fallback value of an Output port
    ///
    /// Configuring the same port again replaces its fallback.
    pub fn configure_safe_state(
        &mut self,
        registry: &ComponentRegistry,
        port: PortRef,
        fallback: &str,
    ) -> ArchResult<&SafeState> {
        let resolved = registry.resolve_port(&port)?;
        if resolved.kind != PortKind::Output {
            return Err(ArchError::PortKindMismatch {
                port: port.to_string(),
                expected: "Output",
                actual: resolved.kind,
            });
        }

        if let Some(pos) = self.states.iter().position(|s| s.port == port) {
            warn!(
                manager = %self.name,
                %port,
                previous = %self.states[pos].fallback,
                %fallback,
                "Overriding safe state"
            );
            self.states[pos].fallback = fallback.to_string();
            return Ok(&self.states[pos]);
        }

        info!(manager = %self.name, %port, %fallback, "Configured safe state");
        self.states.push(SafeState {
            port,
            fallback: fallback.to_string(),
        });
        Ok(&self.states[self.states.len() - 1])
    }

    /// Fallback configured for a port
    pub fn fallback_for(&self, port: &PortRef) -> Option<&str> {
        self.states
            .iter()
            .find(|s| &s.port == port)
            .map(|s| s.fallback.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SafeState> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
