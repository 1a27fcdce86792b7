//! Signal models

use serde::{Deserialize, Serialize};

use crate::refs::PortRef;

/// Directed data edge between two component ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Unique signal name
    pub name: String,
    /// Producing port (Output or Diagnostic)
    pub source: PortRef,
    /// Consuming port (Input or Diagnostic)
    pub target: PortRef,
}
