//! Functional safety models

use serde::{Deserialize, Serialize};

use crate::refs::PortRef;

/// Fallback value an actuator output takes when normal control is lost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeState {
    /// Output port the fallback applies to
    pub port: PortRef,
    /// Fallback value (e.g., "ZeroTorque")
    pub fallback: String,
}
