//! Port models

use serde::{Deserialize, Serialize};

/// Direction/role of a port on a software component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// Receives data
    Input,
    /// Produces data
    Output,
    /// Diagnostic or redundancy channel, usable in both directions
    Diagnostic,
}

impl PortKind {
    /// Whether a port of this kind may originate a signal
    pub fn can_source(self) -> bool {
        matches!(self, PortKind::Output | PortKind::Diagnostic)
    }

    /// Whether a port of this kind may terminate a signal
    pub fn can_sink(self) -> bool {
        matches!(self, PortKind::Input | PortKind::Diagnostic)
    }
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PortKind::Input => "Input",
            PortKind::Output => "Output",
            PortKind::Diagnostic => "Diagnostic",
        };
        f.write_str(s)
    }
}

/// Typed attachment point on a software component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub kind: PortKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_rules() {
        assert!(PortKind::Output.can_source());
        assert!(PortKind::Diagnostic.can_source());
        assert!(!PortKind::Input.can_source());

        assert!(PortKind::Input.can_sink());
        assert!(PortKind::Diagnostic.can_sink());
        assert!(!PortKind::Output.can_sink());
    }
}
