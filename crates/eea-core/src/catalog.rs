//! Port-name catalog
//!
//! Port kinds are never declared explicitly; they follow from the port name.
//! The catalog is an ordered list of substring patterns and the first pattern
//! contained in a name decides its kind, so `RedundancyInput` is an Input even
//! though it also mentions redundancy.

use serde::{Deserialize, Serialize};

use crate::error::{ArchError, ArchResult};
use crate::models::PortKind;

/// One catalog rule: a name containing `pattern` has kind `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortPattern {
    pub pattern: String,
    pub kind: PortKind,
}

impl PortPattern {
    pub fn new(pattern: impl Into<String>, kind: PortKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
        }
    }
}

/// Ordered port-name classification rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    patterns: Vec<PortPattern>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            patterns: vec![
                PortPattern::new("Input", PortKind::Input),
                PortPattern::new("Output", PortKind::Output),
                PortPattern::new("Diagnostic", PortKind::Diagnostic),
                PortPattern::new("Redundancy", PortKind::Diagnostic),
                // Actuator feedback sinks (TorqueFeedback, BrakeForceFeedback)
                PortPattern::new("Feedback", PortKind::Input),
            ],
        }
    }
}

impl Catalog {
    /// Catalog with no rules at all
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a rule after the existing ones
    pub fn with_pattern(mut self, pattern: impl Into<String>, kind: PortKind) -> Self {
        self.patterns.push(PortPattern::new(pattern, kind));
        self
    }

    /// Append several rules after the existing ones
    pub fn extend(&mut self, patterns: impl IntoIterator<Item = PortPattern>) {
        self.patterns.extend(patterns);
    }

    pub fn patterns(&self) -> &[PortPattern] {
        &self.patterns
    }

    /// Classify a port name
    pub fn classify(&self, port_name: &str) -> ArchResult<PortKind> {
        self.patterns
            .iter()
            .find(|p| !p.pattern.is_empty() && port_name.contains(p.pattern.as_str()))
            .map(|p| p.kind)
            .ok_or_else(|| ArchError::UnrecognizedPortName(port_name.to_string()))
    }
}
