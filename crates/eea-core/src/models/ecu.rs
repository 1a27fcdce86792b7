//! ECU models

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Electronic control unit hosting software components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ecu {
    pub name: String,
    /// Names of the components placed on this ECU
    pub components: BTreeSet<String>,
}

impl Ecu {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: BTreeSet::new(),
        }
    }

    pub fn hosts(&self, component: &str) -> bool {
        self.components.contains(component)
    }
}
