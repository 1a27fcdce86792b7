//! Software component models

use serde::{Deserialize, Serialize};

use super::{Port, PortKind};

/// A software component (SWC) and its ordered ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareComponent {
    /// Unique component name
    pub name: String,
    /// Ports in declaration order
    pub ports: Vec<Port>,
}

impl SoftwareComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
        }
    }

    /// Find a port by name
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Whether the component has a port with this name
    pub fn has_port(&self, name: &str) -> bool {
        self.port(name).is_some()
    }

    /// Ports of a given kind, in declaration order
    pub fn ports_of_kind(&self, kind: PortKind) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(move |p| p.kind == kind)
    }
}

/// Name prefix marking the hot-standby twin of a component
pub const REDUNDANT_PREFIX: &str = "Redundant";

/// A primary component and its redundant twin
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RedundancyPair {
    pub primary: String,
    pub redundant: String,
}

impl RedundancyPair {
    pub fn new(primary: impl Into<String>, redundant: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            redundant: redundant.into(),
        }
    }

    /// Primary name implied by a `Redundant<Name>` component, if any
    ///
    /// ```
    /// # use eea_core::RedundancyPair;
    /// assert_eq!(
    ///     RedundancyPair::implied_primary("RedundantBrakeController"),
    ///     Some("BrakeController")
    /// );
    /// assert_eq!(RedundancyPair::implied_primary("BrakeController"), None);
    /// ```
    pub fn implied_primary(name: &str) -> Option<&str> {
        name.strip_prefix(REDUNDANT_PREFIX)
            .filter(|rest| !rest.is_empty())
    }

    /// Whether both pairs name the same two components, in either role
    pub fn same_members(&self, other: &RedundancyPair) -> bool {
        (self.primary == other.primary && self.redundant == other.redundant)
            || (self.primary == other.redundant && self.redundant == other.primary)
    }
}
