//! ECU assignment - places software components on ECUs

use std::collections::HashMap;

use tracing::{debug, info};

use super::ComponentRegistry;
use crate::error::{ArchError, ArchResult};
use crate::models::Ecu;

#[derive(Debug, Clone, Default)]
pub struct EcuAssignment {
    ecus: Vec<Ecu>,
    index: HashMap<String, usize>,
    /// Component name -> ECU name
    placement: HashMap<String, String>,
}

impl EcuAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `component` on `ecu`, creating the ECU on first use
    ///
    /// Re-assigning a component to the ECU it already lives on is a no-op.
    pub fn assign(&mut self, registry: &ComponentRegistry, ecu: &str, component: &str) -> ArchResult<()> {
        registry.lookup(component)?;

        match self.placement.get(component) {
            Some(current) if current == ecu => {
                debug!(%component, %ecu, "Component already assigned");
                return Ok(());
            }
            Some(current) => {
                return Err(ArchError::DoubleAssignment {
                    component: component.to_string(),
                    assigned: current.clone(),
                    requested: ecu.to_string(),
                });
            }
            None => {}
        }

        let idx = match self.index.get(ecu) {
            Some(&idx) => idx,
            None => {
                info!(%ecu, "Created ECU");
                let idx = self.ecus.len();
                self.ecus.push(Ecu::new(ecu));
                self.index.insert(ecu.to_string(), idx);
                idx
            }
        };

        self.ecus[idx].components.insert(component.to_string());
        self.placement
            .insert(component.to_string(), ecu.to_string());
        info!(%component, %ecu, "Assigned component to ECU");
        Ok(())
    }

    /// ECU hosting `component`, if any
    pub fn ecu_of(&self, component: &str) -> Option<&str> {
        self.placement.get(component).map(String::as_str)
    }

    pub fn is_assigned(&self, component: &str) -> bool {
        self.placement.contains_key(component)
    }

    pub fn get(&self, ecu: &str) -> Option<&Ecu> {
        self.index.get(ecu).map(|&idx| &self.ecus[idx])
    }

    pub fn contains_ecu(&self, ecu: &str) -> bool {
        self.index.contains_key(ecu)
    }

    /// ECUs in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Ecu> {
        self.ecus.iter()
    }

    pub fn len(&self) -> usize {
        self.ecus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ecus.is_empty()
    }
}
