//! Name-based port references.
//!
//! Signals, PDUs, safe states and UDS services never hold a component or
//! port directly. They store a `Component.Port` reference that is resolved
//! through the [`ComponentRegistry`](crate::ComponentRegistry) whenever it is
//! needed, so the whole model stays a plain, serializable value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArchError;

/// Separator between component and port in a qualified reference
pub const PORT_SEPARATOR: char = '.';

/// Split `"Component.Port"` into `("Component", "Port")`.
///
/// Only the first `.` separates; returns `None` when there is no separator or
/// either side is empty.
///
/// ```
/// # use eea_core::refs::split_port_ref;
/// assert_eq!(split_port_ref("Gateway.CANInput"), Some(("Gateway", "CANInput")));
/// assert_eq!(split_port_ref("CANInput"), None);
/// ```
pub fn split_port_ref(qualified: &str) -> Option<(&str, &str)> {
    let idx = qualified.find(PORT_SEPARATOR)?;
    let (component, port) = (&qualified[..idx], &qualified[idx + 1..]);
    if component.is_empty() || port.is_empty() {
        return None;
    }
    Some((component, port))
}

/// Join a component and port into `"Component.Port"`.
///
/// ```
/// # use eea_core::refs::qualified_port;
/// assert_eq!(qualified_port("Gateway", "CANInput"), "Gateway.CANInput");
/// ```
pub fn qualified_port(component: &str, port: &str) -> String {
    format!("{}{}{}", component, PORT_SEPARATOR, port)
}

/// Reference to a port on a software component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortRef {
    /// Owning component name
    pub component: String,
    /// Port name on that component
    pub port: String,
}

impl PortRef {
    pub fn new(component: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.component, PORT_SEPARATOR, self.port)
    }
}

impl FromStr for PortRef {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (component, port) = split_port_ref(s.trim()).ok_or_else(|| {
            ArchError::InvalidDefinition(format!(
                "port reference '{}' must have the form Component.Port",
                s
            ))
        })?;
        Ok(PortRef::new(component, port))
    }
}

impl TryFrom<String> for PortRef {
    type Error = ArchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortRef> for String {
    fn from(value: PortRef) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_qualified() {
        assert_eq!(
            split_port_ref("SteeringController.TorqueOutput"),
            Some(("SteeringController", "TorqueOutput"))
        );
    }

    #[test]
    fn split_unqualified() {
        assert_eq!(split_port_ref("TorqueOutput"), None);
    }

    #[test]
    fn split_empty_halves() {
        assert_eq!(split_port_ref(".TorqueOutput"), None);
        assert_eq!(split_port_ref("SteeringController."), None);
    }

    #[test]
    fn split_nested_separator() {
        // Only splits on the first `.`
        assert_eq!(split_port_ref("A.B.C"), Some(("A", "B.C")));
    }

    #[test]
    fn parse_and_display() {
        let r: PortRef = "ActuatorFeedback.TorqueFeedback".parse().unwrap();
        assert_eq!(r.component, "ActuatorFeedback");
        assert_eq!(r.port, "TorqueFeedback");
        assert_eq!(r.to_string(), "ActuatorFeedback.TorqueFeedback");
    }

    #[test]
    fn parse_rejects_bare_port() {
        let err = "TorqueOutput".parse::<PortRef>().unwrap_err();
        assert!(matches!(err, ArchError::InvalidDefinition(_)));
    }

    #[test]
    fn serde_as_string() {
        let r = PortRef::new("Gateway", "LINOutput");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"Gateway.LINOutput\"");
        let back: PortRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
