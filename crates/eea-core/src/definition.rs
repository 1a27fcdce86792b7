//! Declarative architecture definitions
//!
//! A definition describes a whole architecture as data (TOML, YAML or JSON)
//! and is turned into an [`Architecture`] by [`ArchitectureDefinition::build`],
//! which feeds every section to the builders in dependency order.
//!
//! ```toml
//! project = "UltimateSteerBrakeByWire"
//!
//! [[components]]
//! name = "SensorFusion"
//! ports = ["RawSensorInput", "ProcessedSensorOutput"]
//!
//! [[ecus]]
//! name = "SensorFusionECU"
//! components = ["SensorFusion"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::architecture::Architecture;
use crate::builders::{DEFAULT_COM_STACK, DEFAULT_CRYPTO_STACK, DEFAULT_SAFETY_MANAGER, DEFAULT_UDS};
use crate::catalog::{Catalog, PortPattern};
use crate::error::ArchResult;
use crate::models::{Protocol, RedundancyPair};
use crate::refs::PortRef;
use crate::validator::{ArchitectureValidator, SchedulingPolicy};

/// Complete description of one architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureDefinition {
    /// Project name handed to the export backend
    pub project: String,
    /// Treatment of shared (core, priority) slots
    #[serde(default)]
    pub scheduling_policy: SchedulingPolicy,
    /// Extra port-name rules appended to the built-in catalog
    #[serde(default)]
    pub port_patterns: Vec<PortPattern>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub signals: Vec<SignalDef>,
    #[serde(default)]
    pub com_stack: ComStackDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto: Option<CryptoDef>,
    #[serde(default)]
    pub ecus: Vec<EcuDef>,
    #[serde(default)]
    pub tasks: Vec<TaskDef>,
    #[serde(default)]
    pub safety: SafetyDef,
    #[serde(default)]
    pub diagnostics: DiagnosticsDef,
    /// Redundancy pairs beyond the `Redundant<Name>` convention
    #[serde(default)]
    pub redundancy: Vec<RedundancyPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDef {
    pub name: String,
    pub source: PortRef,
    pub target: PortRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComStackDef {
    #[serde(default = "default_com_stack")]
    pub name: String,
    #[serde(default)]
    pub pdus: Vec<PduDef>,
}

impl Default for ComStackDef {
    fn default() -> Self {
        Self {
            name: default_com_stack(),
            pdus: Vec::new(),
        }
    }
}

fn default_com_stack() -> String {
    DEFAULT_COM_STACK.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PduDef {
    pub name: String,
    pub protocol: Protocol,
    pub signal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoDef {
    #[serde(default = "default_crypto_stack")]
    pub name: String,
    pub key_id: String,
    pub mac_algorithm: String,
    pub key_exchange: String,
    pub integrity_algorithm: String,
}

fn default_crypto_stack() -> String {
    DEFAULT_CRYPTO_STACK.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcuDef {
    pub name: String,
    #[serde(default)]
    pub components: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDef {
    pub name: String,
    pub priority: u32,
    #[serde(default)]
    pub core: u32,
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyDef {
    #[serde(default = "default_safety_manager")]
    pub name: String,
    #[serde(default)]
    pub safe_states: Vec<SafeStateDef>,
}

impl Default for SafetyDef {
    fn default() -> Self {
        Self {
            name: default_safety_manager(),
            safe_states: Vec::new(),
        }
    }
}

fn default_safety_manager() -> String {
    DEFAULT_SAFETY_MANAGER.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeStateDef {
    pub port: PortRef,
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsDef {
    #[serde(default = "default_uds")]
    pub name: String,
    #[serde(default)]
    pub services: Vec<UdsServiceDef>,
}

impl Default for DiagnosticsDef {
    fn default() -> Self {
        Self {
            name: default_uds(),
            services: Vec::new(),
        }
    }
}

fn default_uds() -> String {
    DEFAULT_UDS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdsServiceDef {
    pub request: PortRef,
    pub response: PortRef,
    pub ecus: Vec<String>,
}

impl ArchitectureDefinition {
    /// Load a definition, picking the format from the file extension
    ///
    /// `.yaml`/`.yml` and `.json` are recognised; anything else is read as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> ArchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(content: &str) -> ArchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> ArchResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validator configured with this definition's scheduling policy
    pub fn validator(&self) -> ArchitectureValidator {
        ArchitectureValidator::new(self.scheduling_policy)
    }

    /// Build the architecture in dependency order
    ///
    /// Stops at the first structural error.
    pub fn build(&self) -> ArchResult<Architecture> {
        info!(project = %self.project, "Building architecture");

        let mut catalog = Catalog::default();
        catalog.extend(self.port_patterns.iter().cloned());

        let mut arch = Architecture::new(self.project.as_str())
            .with_catalog(catalog)
            .with_com_stack(self.com_stack.name.as_str())
            .with_crypto_stack(
                self.crypto
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(default_crypto_stack),
            )
            .with_safety_manager(self.safety.name.as_str())
            .with_uds(self.diagnostics.name.as_str());

        for component in &self.components {
            arch.add_component(&component.name, &component.ports)?;
        }

        for signal in &self.signals {
            arch.add_signal(&signal.name, signal.source.clone(), signal.target.clone())?;
        }

        for pdu in &self.com_stack.pdus {
            arch.configure_pdu(&pdu.name, pdu.protocol, &pdu.signal)?;
        }

        if let Some(crypto) = &self.crypto {
            arch.configure_crypto(
                &crypto.key_id,
                &crypto.mac_algorithm,
                &crypto.key_exchange,
                &crypto.integrity_algorithm,
            );
        }

        for ecu in &self.ecus {
            for component in &ecu.components {
                arch.assign(&ecu.name, component)?;
            }
        }

        for task in &self.tasks {
            arch.add_task(&task.name, task.priority, task.core, &task.component)?;
        }

        for state in &self.safety.safe_states {
            arch.configure_safe_state(state.port.clone(), &state.fallback)?;
        }

        for service in &self.diagnostics.services {
            arch.bind_uds_service(
                service.request.clone(),
                service.response.clone(),
                service.ecus.iter().cloned(),
            )?;
        }

        for pair in &self.redundancy {
            arch.declare_redundancy(&pair.primary, &pair.redundant)?;
        }

        info!(
            project = %self.project,
            components = arch.components().len(),
            signals = arch.signals().len(),
            ecus = arch.ecus().len(),
            tasks = arch.scheduler().len(),
            "Architecture built"
        );
        Ok(arch)
    }

    /// The UltimateSteerBrakeByWire platform
    pub fn steer_brake_by_wire() -> Self {
        fn component(name: &str, ports: &[&str]) -> ComponentDef {
            ComponentDef {
                name: name.to_string(),
                ports: ports.iter().map(|p| p.to_string()).collect(),
            }
        }
        fn signal(name: &str, source: &str, target: &str) -> SignalDef {
            SignalDef {
                name: name.to_string(),
                source: port(source),
                target: port(target),
            }
        }
        fn ecu(name: &str, components: &[&str]) -> EcuDef {
            EcuDef {
                name: name.to_string(),
                components: components.iter().map(|c| c.to_string()).collect(),
            }
        }
        fn task(name: &str, priority: u32, core: u32, component: &str) -> TaskDef {
            TaskDef {
                name: name.to_string(),
                priority,
                core,
                component: component.to_string(),
            }
        }
        fn port(qualified: &str) -> PortRef {
            let (component, port) = crate::refs::split_port_ref(qualified)
                .unwrap_or((qualified, ""));
            PortRef::new(component, port)
        }

        Self {
            project: "UltimateSteerBrakeByWire".to_string(),
            scheduling_policy: SchedulingPolicy::Cooperative,
            port_patterns: Vec::new(),
            components: vec![
                component(
                    "SteeringController",
                    &[
                        "SteeringAngleInput",
                        "TorqueOutput",
                        "DiagnosticRequest",
                        "DiagnosticResponse",
                        "RedundancyInput",
                    ],
                ),
                component(
                    "BrakeController",
                    &[
                        "BrakePedalInput",
                        "BrakeForceOutput",
                        "DiagnosticRequest",
                        "DiagnosticResponse",
                        "RedundancyInput",
                    ],
                ),
                component(
                    "RedundantSteeringController",
                    &["SteeringAngleInput", "TorqueOutput", "RedundancyControl"],
                ),
                component(
                    "RedundantBrakeController",
                    &["BrakePedalInput", "BrakeForceOutput", "RedundancyControl"],
                ),
                component(
                    "ActuatorFeedback",
                    &["TorqueFeedback", "BrakeForceFeedback", "StatusOutput"],
                ),
                component("SensorFusion", &["RawSensorInput", "ProcessedSensorOutput"]),
                component(
                    "Gateway",
                    &[
                        "CANInput",
                        "CANOutput",
                        "EthernetInput",
                        "EthernetOutput",
                        "LINInput",
                        "LINOutput",
                    ],
                ),
            ],
            signals: vec![
                signal(
                    "SteeringAngleSignal",
                    "SensorFusion.ProcessedSensorOutput",
                    "SteeringController.SteeringAngleInput",
                ),
                signal(
                    "TorqueSignal",
                    "SteeringController.TorqueOutput",
                    "ActuatorFeedback.TorqueFeedback",
                ),
                signal(
                    "BrakePedalSignal",
                    "SensorFusion.ProcessedSensorOutput",
                    "BrakeController.BrakePedalInput",
                ),
                signal(
                    "BrakeForceSignal",
                    "BrakeController.BrakeForceOutput",
                    "ActuatorFeedback.BrakeForceFeedback",
                ),
                signal(
                    "RedundantTorqueSignal",
                    "RedundantSteeringController.TorqueOutput",
                    "ActuatorFeedback.TorqueFeedback",
                ),
                signal(
                    "RedundantBrakeForceSignal",
                    "RedundantBrakeController.BrakeForceOutput",
                    "ActuatorFeedback.BrakeForceFeedback",
                ),
            ],
            com_stack: ComStackDef {
                name: DEFAULT_COM_STACK.to_string(),
                pdus: vec![
                    PduDef {
                        name: "SteeringPDU_CAN".to_string(),
                        protocol: Protocol::Can,
                        signal: "SteeringAngleSignal".to_string(),
                    },
                    PduDef {
                        name: "BrakingPDU_CAN".to_string(),
                        protocol: Protocol::Can,
                        signal: "BrakePedalSignal".to_string(),
                    },
                ],
            },
            crypto: Some(CryptoDef {
                name: DEFAULT_CRYPTO_STACK.to_string(),
                key_id: "SecureKey".to_string(),
                mac_algorithm: "HMAC".to_string(),
                key_exchange: "StartupKeyExchange".to_string(),
                integrity_algorithm: "CRC32".to_string(),
            }),
            ecus: vec![
                ecu(
                    "SteeringECU",
                    &["SteeringController", "RedundantSteeringController"],
                ),
                ecu("BrakeECU", &["BrakeController", "RedundantBrakeController"]),
                ecu("ActuatorECU", &["ActuatorFeedback"]),
                ecu("SensorFusionECU", &["SensorFusion"]),
                ecu("GatewayECU", &["Gateway"]),
            ],
            tasks: vec![
                task("SteeringControlTask", 1, 0, "SteeringController"),
                task("BrakeControlTask", 1, 1, "BrakeController"),
                task("SensorFusionTask", 2, 0, "SensorFusion"),
                task("GatewayTask", 3, 1, "Gateway"),
            ],
            safety: SafetyDef {
                name: DEFAULT_SAFETY_MANAGER.to_string(),
                safe_states: vec![
                    SafeStateDef {
                        port: port("SteeringController.TorqueOutput"),
                        fallback: "ZeroTorque".to_string(),
                    },
                    SafeStateDef {
                        port: port("BrakeController.BrakeForceOutput"),
                        fallback: "ZeroForce".to_string(),
                    },
                ],
            },
            diagnostics: DiagnosticsDef {
                name: DEFAULT_UDS.to_string(),
                services: vec![UdsServiceDef {
                    request: port("SteeringController.DiagnosticRequest"),
                    response: port("SteeringController.DiagnosticResponse"),
                    ecus: vec!["SteeringECU".to_string(), "BrakeECU".to_string()],
                }],
            },
            redundancy: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchError;
    use crate::models::PortKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_builds_and_validates() {
        let definition = ArchitectureDefinition::steer_brake_by_wire();
        let arch = definition.build().unwrap();
        let snapshot = definition.validator().validate(&arch).unwrap();

        assert_eq!(snapshot.project(), "UltimateSteerBrakeByWire");
        assert_eq!(snapshot.components().len(), 7);
        assert_eq!(snapshot.signals().len(), 6);
        assert_eq!(snapshot.ecus().len(), 5);
        assert_eq!(snapshot.tasks().len(), 4);
        assert_eq!(snapshot.uds_services().len(), 1);
        assert_eq!(snapshot.redundancy().len(), 2);
        assert!(snapshot.warnings().is_empty());
    }

    #[test]
    fn test_bundled_toml_matches_builtin() {
        let content = include_str!("../../../config/steer-brake-by-wire.toml");
        let parsed = ArchitectureDefinition::from_toml(content).unwrap();
        assert_eq!(parsed, ArchitectureDefinition::steer_brake_by_wire());
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
project: Minimal
components:
  - name: SensorFusion
    ports: [RawSensorInput, ProcessedSensorOutput]
ecus:
  - name: SensorFusionECU
    components: [SensorFusion]
tasks:
  - name: SensorFusionTask
    priority: 2
    component: SensorFusion
"#;
        let definition = ArchitectureDefinition::from_yaml(yaml).unwrap();
        assert_eq!(definition.com_stack.name, "AdvancedCOMStack");
        assert_eq!(definition.safety.name, "UltimateSafetyManager");
        assert_eq!(definition.scheduling_policy, SchedulingPolicy::Cooperative);
        assert_eq!(definition.tasks[0].core, 0);
        assert!(definition.crypto.is_none());

        let arch = definition.build().unwrap();
        assert_eq!(arch.security().name(), "UltimateCryptoStack");
        assert!(arch.security().config().is_none());
        assert!(definition.validator().validate(&arch).is_ok());
    }

    #[test]
    fn test_custom_port_patterns() {
        let toml = r#"
project = "Patterns"

[[port_patterns]]
pattern = "Speed"
kind = "output"

[[components]]
name = "WheelSensor"
ports = ["WheelSpeed"]
"#;
        let definition = ArchitectureDefinition::from_toml(toml).unwrap();
        let arch = definition.build().unwrap();
        let swc = arch.components().lookup("WheelSensor").unwrap();
        assert_eq!(swc.ports[0].kind, PortKind::Output);
    }

    #[test]
    fn test_build_stops_at_first_error() {
        let mut definition = ArchitectureDefinition::steer_brake_by_wire();
        // Schedule the gateway before it has an ECU
        definition.ecus.retain(|e| e.name != "GatewayECU");
        match definition.build() {
            Err(ArchError::UnscheduledComponent(c)) => assert_eq!(c, "Gateway"),
            other => panic!("Expected UnscheduledComponent, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_bad_port_ref_in_definition() {
        let toml = r#"
project = "Bad"

[[signals]]
name = "S"
source = "NoSeparator"
target = "A.B"
"#;
        assert!(matches!(
            ArchitectureDefinition::from_toml(toml),
            Err(ArchError::Toml(_))
        ));
    }
}
