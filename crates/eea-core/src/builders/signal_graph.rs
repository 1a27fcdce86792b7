//! Signal graph - directed data edges between component ports
//!
//! Cycles are allowed: actuator feedback routed back into a controller is a
//! normal pattern in by-wire systems.

use std::collections::HashMap;

use tracing::{debug, info};

use super::ComponentRegistry;
use crate::error::{ArchError, ArchResult};
use crate::models::Signal;
use crate::refs::PortRef;

#[derive(Debug, Clone, Default)]
pub struct SignalGraph {
    signals: Vec<Signal>,
    index: HashMap<String, usize>,
}

impl SignalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signal from `source` to `target`
    ///
    /// Both ports must resolve in the registry; the source must be able to
    /// produce data (Output/Diagnostic) and the target to consume it
    /// (Input/Diagnostic).
    pub fn add_signal(
        &mut self,
        registry: &ComponentRegistry,
        name: &str,
        source: PortRef,
        target: PortRef,
    ) -> ArchResult<&Signal> {
        if self.index.contains_key(name) {
            return Err(ArchError::DuplicateName {
                kind: "signal",
                name: name.to_string(),
            });
        }

        let source_port = registry.resolve_port(&source)?;
        if !source_port.kind.can_source() {
            return Err(ArchError::PortKindMismatch {
                port: source.to_string(),
                expected: "Output or Diagnostic",
                actual: source_port.kind,
            });
        }

        let target_port = registry.resolve_port(&target)?;
        if !target_port.kind.can_sink() {
            return Err(ArchError::PortKindMismatch {
                port: target.to_string(),
                expected: "Input or Diagnostic",
                actual: target_port.kind,
            });
        }

        info!(signal = %name, %source, %target, "Mapped signal");

        let idx = self.signals.len();
        self.index.insert(name.to_string(), idx);
        self.signals.push(Signal {
            name: name.to_string(),
            source,
            target,
        });
        Ok(&self.signals[idx])
    }

    /// Remove a signal, returning it if it existed
    pub fn remove_signal(&mut self, name: &str) -> Option<Signal> {
        let idx = self.index.remove(name)?;
        let removed = self.signals.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        debug!(signal = %name, "Removed signal");
        Some(removed)
    }

    pub fn get(&self, name: &str) -> Option<&Signal> {
        self.index.get(name).map(|&idx| &self.signals[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Signals whose source port belongs to `component`
    pub fn signals_from<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Signal> + 'a {
        self.signals
            .iter()
            .filter(move |s| s.source.component == component)
    }

    /// Signals whose target port belongs to `component`
    pub fn signals_into<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Signal> + 'a {
        self.signals
            .iter()
            .filter(move |s| s.target.component == component)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new(Catalog::default());
        registry
            .add_component(
                "SteeringController",
                ["SteeringAngleInput", "TorqueOutput", "DiagnosticRequest"],
            )
            .unwrap();
        registry
            .add_component(
                "ActuatorFeedback",
                ["TorqueFeedback", "BrakeForceFeedback", "StatusOutput"],
            )
            .unwrap();
        registry
            .add_component("SensorFusion", ["RawSensorInput", "ProcessedSensorOutput"])
            .unwrap();
        registry
    }

    fn r(s: &str) -> PortRef {
        s.parse().unwrap()
    }

    #[test]
    fn test_output_to_input() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        let signal = graph
            .add_signal(
                &registry,
                "SteeringAngleSignal",
                r("SensorFusion.ProcessedSensorOutput"),
                r("SteeringController.SteeringAngleInput"),
            )
            .unwrap();
        assert_eq!(signal.source.component, "SensorFusion");
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_input_as_source_is_rejected() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        let err = graph
            .add_signal(
                &registry,
                "Backwards",
                r("SteeringController.SteeringAngleInput"),
                r("ActuatorFeedback.TorqueFeedback"),
            )
            .unwrap_err();
        match err {
            ArchError::PortKindMismatch { port, actual, .. } => {
                assert_eq!(port, "SteeringController.SteeringAngleInput");
                assert_eq!(actual, crate::models::PortKind::Input);
            }
            other => panic!("Expected PortKindMismatch, got {:?}", other),
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_output_as_target_is_rejected() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        let err = graph
            .add_signal(
                &registry,
                "IntoOutput",
                r("SensorFusion.ProcessedSensorOutput"),
                r("ActuatorFeedback.StatusOutput"),
            )
            .unwrap_err();
        assert!(matches!(err, ArchError::PortKindMismatch { .. }));
    }

    #[test]
    fn test_dangling_reference() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        let err = graph
            .add_signal(
                &registry,
                "Ghost",
                r("Gateway.CANOutput"),
                r("SteeringController.SteeringAngleInput"),
            )
            .unwrap_err();
        assert!(matches!(err, ArchError::DanglingReference(ref s) if s == "Gateway.CANOutput"));
    }

    #[test]
    fn test_diagnostic_ports_work_both_ways() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        graph
            .add_signal(
                &registry,
                "DiagOut",
                r("SteeringController.DiagnosticRequest"),
                r("SteeringController.SteeringAngleInput"),
            )
            .unwrap();
        graph
            .add_signal(
                &registry,
                "DiagIn",
                r("SensorFusion.ProcessedSensorOutput"),
                r("SteeringController.DiagnosticRequest"),
            )
            .unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_feedback_loop_is_allowed() {
        let mut registry = registry();
        registry
            .add_port("ActuatorFeedback", "TorqueOutput")
            .unwrap();
        let mut graph = SignalGraph::new();
        graph
            .add_signal(
                &registry,
                "Torque",
                r("SteeringController.TorqueOutput"),
                r("ActuatorFeedback.TorqueFeedback"),
            )
            .unwrap();
        graph
            .add_signal(
                &registry,
                "TorqueEcho",
                r("ActuatorFeedback.TorqueOutput"),
                r("SteeringController.SteeringAngleInput"),
            )
            .unwrap();
        assert_eq!(graph.signals_from("ActuatorFeedback").count(), 1);
        assert_eq!(graph.signals_into("ActuatorFeedback").count(), 1);
    }

    #[test]
    fn test_duplicate_and_remove() {
        let registry = registry();
        let mut graph = SignalGraph::new();
        for name in ["A", "B"] {
            graph
                .add_signal(
                    &registry,
                    name,
                    r("SensorFusion.ProcessedSensorOutput"),
                    r("SteeringController.SteeringAngleInput"),
                )
                .unwrap();
        }
        assert!(matches!(
            graph.add_signal(
                &registry,
                "A",
                r("SensorFusion.ProcessedSensorOutput"),
                r("SteeringController.SteeringAngleInput"),
            ),
            Err(ArchError::DuplicateName { kind: "signal", .. })
        ));

        assert!(graph.remove_signal("A").is_some());
        assert!(graph.remove_signal("A").is_none());
        assert_eq!(graph.get("B").map(|s| s.name.as_str()), Some("B"));
        assert_eq!(graph.len(), 1);
    }
}
