//! Communication stack - PDUs grouped by bus protocol

use std::collections::{BTreeMap, HashSet};

use tracing::info;

use super::SignalGraph;
use crate::error::{ArchError, ArchResult};
use crate::models::{Pdu, Protocol};

/// Default name of the communication stack
pub const DEFAULT_COM_STACK: &str = "AdvancedCOMStack";

#[derive(Debug, Clone)]
pub struct StackConfigurator {
    name: String,
    pdus: Vec<Pdu>,
    names: HashSet<String>,
    /// Protocol -> positions in `pdus`, in configuration order
    by_protocol: BTreeMap<Protocol, Vec<usize>>,
}

impl Default for StackConfigurator {
    fn default() -> Self {
        Self::new(DEFAULT_COM_STACK)
    }
}

impl StackConfigurator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pdus: Vec::new(),
            names: HashSet::new(),
            by_protocol: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configure a PDU carrying an existing signal
    pub fn configure_pdu(
        &mut self,
        signals: &SignalGraph,
        name: &str,
        protocol: Protocol,
        signal: &str,
    ) -> ArchResult<&Pdu> {
        if !signals.contains(signal) {
            return Err(ArchError::UnknownSignal(signal.to_string()));
        }
        if !self.names.insert(name.to_string()) {
            return Err(ArchError::DuplicateName {
                kind: "PDU",
                name: name.to_string(),
            });
        }

        info!(stack = %self.name, pdu = %name, %protocol, %signal, "Configured PDU");

        let idx = self.pdus.len();
        self.pdus.push(Pdu {
            name: name.to_string(),
            protocol,
            signal: signal.to_string(),
        });
        self.by_protocol.entry(protocol).or_default().push(idx);
        Ok(&self.pdus[idx])
    }

    /// PDUs carried over one protocol, in configuration order
    pub fn pdus_for(&self, protocol: Protocol) -> impl Iterator<Item = &Pdu> {
        self.by_protocol
            .get(&protocol)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.pdus[idx])
    }

    /// Protocols that carry at least one PDU
    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.by_protocol.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pdu> {
        self.pdus.iter()
    }

    pub fn len(&self) -> usize {
        self.pdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ComponentRegistry;

    fn graph() -> (ComponentRegistry, SignalGraph) {
        let mut registry = ComponentRegistry::default();
        registry
            .add_component("SensorFusion", ["ProcessedSensorOutput"])
            .unwrap();
        registry
            .add_component("SteeringController", ["SteeringAngleInput"])
            .unwrap();
        registry
            .add_component("BrakeController", ["BrakePedalInput"])
            .unwrap();
        let mut graph = SignalGraph::new();
        graph
            .add_signal(
                &registry,
                "SteeringAngleSignal",
                "SensorFusion.ProcessedSensorOutput".parse().unwrap(),
                "SteeringController.SteeringAngleInput".parse().unwrap(),
            )
            .unwrap();
        graph
            .add_signal(
                &registry,
                "BrakePedalSignal",
                "SensorFusion.ProcessedSensorOutput".parse().unwrap(),
                "BrakeController.BrakePedalInput".parse().unwrap(),
            )
            .unwrap();
        (registry, graph)
    }

    #[test]
    fn test_group_by_protocol() {
        let (_, graph) = graph();
        let mut stack = StackConfigurator::default();
        stack
            .configure_pdu(&graph, "SteeringPDU_CAN", Protocol::Can, "SteeringAngleSignal")
            .unwrap();
        stack
            .configure_pdu(&graph, "BrakingPDU_CAN", Protocol::Can, "BrakePedalSignal")
            .unwrap();
        stack
            .configure_pdu(&graph, "SteeringPDU_ETH", Protocol::Ethernet, "SteeringAngleSignal")
            .unwrap();

        let can: Vec<&str> = stack
            .pdus_for(Protocol::Can)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(can, vec!["SteeringPDU_CAN", "BrakingPDU_CAN"]);
        assert_eq!(stack.pdus_for(Protocol::Ethernet).count(), 1);
        assert_eq!(stack.pdus_for(Protocol::Lin).count(), 0);
        assert_eq!(
            stack.protocols().collect::<Vec<_>>(),
            vec![Protocol::Can, Protocol::Ethernet]
        );
        assert_eq!(stack.name(), "AdvancedCOMStack");
    }

    #[test]
    fn test_unknown_signal() {
        let (_, graph) = graph();
        let mut stack = StackConfigurator::default();
        // A port name is not a signal
        let err = stack
            .configure_pdu(&graph, "ActuatorStatusPDU_LIN", Protocol::Lin, "StatusOutput")
            .unwrap_err();
        assert!(matches!(err, ArchError::UnknownSignal(ref s) if s == "StatusOutput"));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_duplicate_pdu() {
        let (_, graph) = graph();
        let mut stack = StackConfigurator::default();
        stack
            .configure_pdu(&graph, "SteeringPDU_CAN", Protocol::Can, "SteeringAngleSignal")
            .unwrap();
        assert!(matches!(
            stack.configure_pdu(&graph, "SteeringPDU_CAN", Protocol::Can, "BrakePedalSignal"),
            Err(ArchError::DuplicateName { kind: "PDU", .. })
        ));
        assert_eq!(stack.len(), 1);
    }
}
