//! Aggregate architecture model and the validated snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::builders::{
    ComponentRegistry, DiagnosticsBinder, EcuAssignment, SafetyManager, Scheduler,
    SecurityConfigurator, SignalGraph, StackConfigurator,
};
use crate::catalog::Catalog;
use crate::error::{ArchError, ArchResult};
use crate::models::{
    CryptoConfig, Ecu, Pdu, Port, Protocol, RedundancyPair, SafeState, Signal,
    SoftwareComponent, Task, UdsService,
};
use crate::refs::PortRef;
use crate::validator::{SchedulingPolicy, Violation};

/// The in-progress architecture of one project
///
/// This is the single writer of the build phase. Each method delegates to the
/// builder owning that part of the model and hands it the earlier builders it
/// resolves references against.
#[derive(Debug, Clone)]
pub struct Architecture {
    project: String,
    registry: ComponentRegistry,
    signals: SignalGraph,
    stack: StackConfigurator,
    security: SecurityConfigurator,
    assignment: EcuAssignment,
    scheduler: Scheduler,
    safety: SafetyManager,
    diagnostics: DiagnosticsBinder,
    declared_pairs: Vec<RedundancyPair>,
}

impl Architecture {
    /// Empty architecture with the default catalog and stack names
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            registry: ComponentRegistry::default(),
            signals: SignalGraph::new(),
            stack: StackConfigurator::default(),
            security: SecurityConfigurator::default(),
            assignment: EcuAssignment::new(),
            scheduler: Scheduler::new(),
            safety: SafetyManager::default(),
            diagnostics: DiagnosticsBinder::default(),
            declared_pairs: Vec::new(),
        }
    }

    // The `with_*` methods replace a whole builder and are meant to be called
    // before anything is added.

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.registry = ComponentRegistry::new(catalog);
        self
    }

    pub fn with_com_stack(mut self, name: impl Into<String>) -> Self {
        self.stack = StackConfigurator::new(name);
        self
    }

    pub fn with_crypto_stack(mut self, name: impl Into<String>) -> Self {
        self.security = SecurityConfigurator::new(name);
        self
    }

    pub fn with_safety_manager(mut self, name: impl Into<String>) -> Self {
        self.safety = SafetyManager::new(name);
        self
    }

    pub fn with_uds(mut self, name: impl Into<String>) -> Self {
        self.diagnostics = DiagnosticsBinder::new(name);
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    // =========================================================================
    // Build operations
    // =========================================================================

    pub fn add_component<I, S>(&mut self, name: &str, port_names: I) -> ArchResult<&SoftwareComponent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.add_component(name, port_names)
    }

    pub fn add_port(&mut self, component: &str, port_name: &str) -> ArchResult<&Port> {
        self.registry.add_port(component, port_name)
    }

    pub fn add_signal(&mut self, name: &str, source: PortRef, target: PortRef) -> ArchResult<&Signal> {
        self.signals.add_signal(&self.registry, name, source, target)
    }

    pub fn remove_signal(&mut self, name: &str) -> Option<Signal> {
        self.signals.remove_signal(name)
    }

    pub fn configure_pdu(&mut self, name: &str, protocol: Protocol, signal: &str) -> ArchResult<&Pdu> {
        self.stack.configure_pdu(&self.signals, name, protocol, signal)
    }

    pub fn configure_crypto(
        &mut self,
        key_id: &str,
        mac_algorithm: &str,
        key_exchange: &str,
        integrity_algorithm: &str,
    ) -> &CryptoConfig {
        self.security.configure(
            &self.stack,
            key_id,
            mac_algorithm,
            key_exchange,
            integrity_algorithm,
        )
    }

    pub fn assign(&mut self, ecu: &str, component: &str) -> ArchResult<()> {
        self.assignment.assign(&self.registry, ecu, component)
    }

    pub fn add_task(
        &mut self,
        name: &str,
        priority: u32,
        core: u32,
        component: &str,
    ) -> ArchResult<&Task> {
        self.scheduler
            .add_task(&self.registry, &self.assignment, name, priority, core, component)
    }

    pub fn configure_safe_state(&mut self, port: PortRef, fallback: &str) -> ArchResult<&SafeState> {
        self.safety.configure_safe_state(&self.registry, port, fallback)
    }

    pub fn bind_uds_service<I, S>(
        &mut self,
        request: PortRef,
        response: PortRef,
        ecus: I,
    ) -> ArchResult<&UdsService>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diagnostics
            .bind_uds_service(&self.registry, &self.assignment, request, response, ecus)
    }

    /// Declare a redundancy pair that does not follow the `Redundant<Name>` convention
    pub fn declare_redundancy(&mut self, primary: &str, redundant: &str) -> ArchResult<()> {
        self.registry.lookup(primary)?;
        self.registry.lookup(redundant)?;
        if primary == redundant {
            return Err(ArchError::InvalidDefinition(format!(
                "component {} cannot be its own redundant twin",
                primary
            )));
        }
        let pair = RedundancyPair::new(primary, redundant);
        if self.declared_pairs.iter().any(|p| p.same_members(&pair)) {
            debug!(%primary, %redundant, "Redundancy pair already declared");
        } else {
            info!(%primary, %redundant, "Declared redundancy pair");
            self.declared_pairs.push(pair);
        }
        Ok(())
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn components(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn signals(&self) -> &SignalGraph {
        &self.signals
    }

    pub fn com_stack(&self) -> &StackConfigurator {
        &self.stack
    }

    pub fn security(&self) -> &SecurityConfigurator {
        &self.security
    }

    pub fn ecus(&self) -> &EcuAssignment {
        &self.assignment
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn safety(&self) -> &SafetyManager {
        &self.safety
    }

    pub fn diagnostics(&self) -> &DiagnosticsBinder {
        &self.diagnostics
    }

    /// Redundancy pairs: every `Redundant<X>` whose `X` is registered, plus
    /// declared pairs; sorted, one entry per pair of components
    ///
    /// A declared pair naming the same components as a derived one, in either
    /// order, is folded into the derived pair.
    pub fn redundancy_pairs(&self) -> Vec<RedundancyPair> {
        let derived = self.registry.iter().filter_map(|swc| {
            let primary = RedundancyPair::implied_primary(&swc.name)?;
            self.registry
                .contains(primary)
                .then(|| RedundancyPair::new(primary, swc.name.as_str()))
        });

        let mut pairs: Vec<RedundancyPair> = Vec::new();
        for pair in derived.chain(self.declared_pairs.iter().cloned()) {
            if !pairs.iter().any(|p| p.same_members(&pair)) {
                pairs.push(pair);
            }
        }
        pairs.sort();
        pairs
    }
}

// =============================================================================
// Validated snapshot
// =============================================================================

/// Communication stack section of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ComStackSnapshot {
    pub name: String,
    pub pdus: Vec<Pdu>,
}

/// Crypto section of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CryptoSnapshot {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<CryptoConfig>,
}

/// Safety section of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SafetySnapshot {
    pub name: String,
    pub safe_states: Vec<SafeState>,
}

/// Diagnostics section of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSnapshot {
    pub name: String,
    pub services: Vec<UdsService>,
}

/// Immutable architecture accepted by the validator
///
/// Only [`ArchitectureValidator`](crate::ArchitectureValidator) creates these;
/// export backends receive nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedArchitecture {
    project: String,
    validated_at: DateTime<Utc>,
    scheduling_policy: SchedulingPolicy,
    components: Vec<SoftwareComponent>,
    signals: Vec<Signal>,
    com_stack: ComStackSnapshot,
    crypto: CryptoSnapshot,
    ecus: Vec<Ecu>,
    tasks: Vec<Task>,
    safety: SafetySnapshot,
    diagnostics: DiagnosticsSnapshot,
    redundancy: Vec<RedundancyPair>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Violation>,
}

impl ValidatedArchitecture {
    pub(crate) fn capture(
        model: &Architecture,
        scheduling_policy: SchedulingPolicy,
        warnings: Vec<Violation>,
    ) -> Self {
        Self {
            project: model.project.clone(),
            validated_at: Utc::now(),
            scheduling_policy,
            components: model.registry.iter().cloned().collect(),
            signals: model.signals.iter().cloned().collect(),
            com_stack: ComStackSnapshot {
                name: model.stack.name().to_string(),
                pdus: model.stack.iter().cloned().collect(),
            },
            crypto: CryptoSnapshot {
                name: model.security.name().to_string(),
                config: model.security.config().cloned(),
            },
            ecus: model.assignment.iter().cloned().collect(),
            tasks: model.scheduler.iter().cloned().collect(),
            safety: SafetySnapshot {
                name: model.safety.name().to_string(),
                safe_states: model.safety.iter().cloned().collect(),
            },
            diagnostics: DiagnosticsSnapshot {
                name: model.diagnostics.name().to_string(),
                services: model.diagnostics.iter().cloned().collect(),
            },
            redundancy: model.redundancy_pairs(),
            warnings,
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn validated_at(&self) -> DateTime<Utc> {
        self.validated_at
    }

    pub fn scheduling_policy(&self) -> SchedulingPolicy {
        self.scheduling_policy
    }

    pub fn components(&self) -> &[SoftwareComponent] {
        &self.components
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn com_stack(&self) -> &ComStackSnapshot {
        &self.com_stack
    }

    pub fn crypto(&self) -> &CryptoSnapshot {
        &self.crypto
    }

    pub fn ecus(&self) -> &[Ecu] {
        &self.ecus
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn safety(&self) -> &SafetySnapshot {
        &self.safety
    }

    pub fn diagnostics(&self) -> &DiagnosticsSnapshot {
        &self.diagnostics
    }

    pub fn uds_services(&self) -> &[UdsService] {
        &self.diagnostics.services
    }

    pub fn redundancy(&self) -> &[RedundancyPair] {
        &self.redundancy
    }

    /// Non-fatal findings (e.g., shared scheduling slots under the cooperative policy)
    pub fn warnings(&self) -> &[Violation] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(s: &str) -> PortRef {
        s.parse().unwrap()
    }

    #[test]
    fn test_derived_redundancy_pairs() {
        let mut arch = Architecture::new("test");
        arch.add_component("SteeringController", ["TorqueOutput"])
            .unwrap();
        arch.add_component("RedundantSteeringController", ["TorqueOutput"])
            .unwrap();
        // No primary registered for this one
        arch.add_component("RedundantPump", ["PressureOutput"])
            .unwrap();

        assert_eq!(
            arch.redundancy_pairs(),
            vec![RedundancyPair::new(
                "SteeringController",
                "RedundantSteeringController"
            )]
        );
    }

    #[test]
    fn test_declared_redundancy_pairs() {
        let mut arch = Architecture::new("test");
        arch.add_component("BrakeController", ["BrakeForceOutput"])
            .unwrap();
        arch.add_component("BackupBrake", ["BrakeForceOutput"])
            .unwrap();
        arch.declare_redundancy("BrakeController", "BackupBrake")
            .unwrap();
        arch.declare_redundancy("BrakeController", "BackupBrake")
            .unwrap();

        assert_eq!(arch.redundancy_pairs().len(), 1);
        assert!(matches!(
            arch.declare_redundancy("BrakeController", "Ghost"),
            Err(ArchError::UnknownComponent(_))
        ));
        assert!(matches!(
            arch.declare_redundancy("BrakeController", "BrakeController"),
            Err(ArchError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn test_reverse_declaration_folds_into_derived_pair() {
        let mut arch = Architecture::new("test");
        arch.add_component("SteeringController", ["TorqueOutput"])
            .unwrap();
        arch.add_component("RedundantSteeringController", ["TorqueOutput"])
            .unwrap();
        arch.declare_redundancy("RedundantSteeringController", "SteeringController")
            .unwrap();
        arch.declare_redundancy("SteeringController", "RedundantSteeringController")
            .unwrap();

        assert_eq!(
            arch.redundancy_pairs(),
            vec![RedundancyPair::new(
                "SteeringController",
                "RedundantSteeringController"
            )]
        );
    }

    #[test]
    fn test_builders_see_earlier_stages() {
        let mut arch = Architecture::new("test").with_com_stack("TestStack");
        arch.add_component("SensorFusion", ["ProcessedSensorOutput"])
            .unwrap();
        arch.add_component("SteeringController", ["SteeringAngleInput"])
            .unwrap();
        arch.add_signal(
            "SteeringAngleSignal",
            r("SensorFusion.ProcessedSensorOutput"),
            r("SteeringController.SteeringAngleInput"),
        )
        .unwrap();
        arch.configure_pdu("SteeringPDU_CAN", Protocol::Can, "SteeringAngleSignal")
            .unwrap();
        let crypto = arch.configure_crypto("SecureKey", "HMAC", "StartupKeyExchange", "CRC32");
        assert_eq!(crypto.stack, "TestStack");

        assert!(matches!(
            arch.add_task("SensorFusionTask", 2, 0, "SensorFusion"),
            Err(ArchError::UnscheduledComponent(_))
        ));
        arch.assign("SensorFusionECU", "SensorFusion").unwrap();
        arch.add_task("SensorFusionTask", 2, 0, "SensorFusion")
            .unwrap();
        assert_eq!(arch.scheduler().len(), 1);
    }
}
