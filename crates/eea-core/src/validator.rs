//! Architecture validator
//!
//! Runs the cross-cutting consistency checks over a finished [`Architecture`]
//! in a fixed order and collects every finding instead of stopping at the
//! first one:
//!
//! 1. names are unique (components, signals, PDUs, tasks)
//! 2. every reference resolves to a port of the right kind
//! 3. every component lives on exactly one ECU
//! 4. no two tasks share a (core, priority) slot
//! 5. redundant twins route their outputs to the same ports as their primary
//! 6. UDS ports live on a component hosted by one of the serving ECUs
//!
//! Findings are sorted by check number and then by entity names, so the
//! result does not depend on the order in which the model was built.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::architecture::{Architecture, ValidatedArchitecture};
use crate::models::{PortKind, RedundancyPair};
use crate::refs::PortRef;

/// How shared (core, priority) slots are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingPolicy {
    /// Shared slots are reported as warnings
    #[default]
    Cooperative,
    /// Shared slots are violations
    Strict,
}

impl std::fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingPolicy::Cooperative => f.write_str("cooperative"),
            SchedulingPolicy::Strict => f.write_str("strict"),
        }
    }
}

/// Category of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DuplicateName,
    DanglingReference,
    PortKindMismatch,
    UnassignedComponent,
    MultipleAssignment,
    PriorityConflict,
    IncompleteRedundancy,
    UdsPlacement,
}

impl ViolationKind {
    /// Number of the check producing this kind
    pub fn invariant(self) -> u8 {
        match self {
            ViolationKind::DuplicateName => 1,
            ViolationKind::DanglingReference | ViolationKind::PortKindMismatch => 2,
            ViolationKind::UnassignedComponent | ViolationKind::MultipleAssignment => 3,
            ViolationKind::PriorityConflict => 4,
            ViolationKind::IncompleteRedundancy => 5,
            ViolationKind::UdsPlacement => 6,
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViolationKind::DuplicateName => "duplicate_name",
            ViolationKind::DanglingReference => "dangling_reference",
            ViolationKind::PortKindMismatch => "port_kind_mismatch",
            ViolationKind::UnassignedComponent => "unassigned_component",
            ViolationKind::MultipleAssignment => "multiple_assignment",
            ViolationKind::PriorityConflict => "priority_conflict",
            ViolationKind::IncompleteRedundancy => "incomplete_redundancy",
            ViolationKind::UdsPlacement => "uds_placement",
        };
        f.write_str(s)
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Offending entity names
    pub entities: Vec<String>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, entities: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entities,
            message: message.into(),
        }
    }

    fn sort_key(&self) -> (u8, &[String], &str) {
        (
            self.kind.invariant(),
            self.entities.as_slice(),
            self.message.as_str(),
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.kind,
            self.message,
            self.entities.join(", ")
        )
    }
}

/// Full result of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArchitectureValidator {
    policy: SchedulingPolicy,
}

impl ArchitectureValidator {
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Validate and, on success, capture an immutable snapshot
    pub fn validate(&self, model: &Architecture) -> Result<ValidatedArchitecture, Vec<Violation>> {
        let report = self.check(model);
        if report.is_ok() {
            info!(
                project = %model.project(),
                warnings = report.warnings.len(),
                "Architecture validated"
            );
            Ok(ValidatedArchitecture::capture(
                model,
                self.policy,
                report.warnings,
            ))
        } else {
            warn!(
                project = %model.project(),
                violations = report.violations.len(),
                "Architecture rejected"
            );
            Err(report.violations)
        }
    }

    /// Run every check and return all findings
    pub fn check(&self, model: &Architecture) -> ValidationReport {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        check_unique_names(model, &mut violations);
        check_references(model, &mut violations);
        check_placement(model, &mut violations);
        match self.policy {
            SchedulingPolicy::Cooperative => check_priority_slots(model, &mut warnings),
            SchedulingPolicy::Strict => check_priority_slots(model, &mut violations),
        }
        check_redundancy(model, &mut violations);
        check_uds_placement(model, &mut violations);

        violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        warnings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        debug!(
            violations = violations.len(),
            warnings = warnings.len(),
            "Validation pass complete"
        );
        ValidationReport {
            violations,
            warnings,
        }
    }
}

// =============================================================================
// Checks
// =============================================================================

fn check_unique_names(model: &Architecture, out: &mut Vec<Violation>) {
    let namespaces: [(&str, Vec<&str>); 4] = [
        (
            "component",
            model.components().iter().map(|c| c.name.as_str()).collect(),
        ),
        (
            "signal",
            model.signals().iter().map(|s| s.name.as_str()).collect(),
        ),
        (
            "PDU",
            model.com_stack().iter().map(|p| p.name.as_str()).collect(),
        ),
        (
            "task",
            model.scheduler().iter().map(|t| t.name.as_str()).collect(),
        ),
    ];

    for (kind, names) in namespaces {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for name in names {
            *counts.entry(name).or_default() += 1;
        }
        for (name, count) in counts.into_iter().filter(|(_, c)| *c > 1) {
            out.push(Violation::new(
                ViolationKind::DuplicateName,
                vec![name.to_string()],
                format!("{} name {} is used {} times", kind, name, count),
            ));
        }
    }
}

/// Resolve `port` and check it against `accepts`, recording any finding
fn check_port(
    model: &Architecture,
    owner: &str,
    port: &PortRef,
    role: &str,
    expected: &str,
    accepts: impl Fn(PortKind) -> bool,
    out: &mut Vec<Violation>,
) {
    match model.components().resolve_port(port) {
        Err(_) => out.push(Violation::new(
            ViolationKind::DanglingReference,
            vec![owner.to_string(), port.to_string()],
            format!("{} {} of {} does not exist", role, port, owner),
        )),
        Ok(resolved) if !accepts(resolved.kind) => out.push(Violation::new(
            ViolationKind::PortKindMismatch,
            vec![owner.to_string(), port.to_string()],
            format!(
                "{} {} of {} is {}, expected {}",
                role, port, owner, resolved.kind, expected
            ),
        )),
        Ok(_) => {}
    }
}

fn check_references(model: &Architecture, out: &mut Vec<Violation>) {
    for signal in model.signals().iter() {
        check_port(
            model,
            &signal.name,
            &signal.source,
            "source",
            "Output or Diagnostic",
            PortKind::can_source,
            out,
        );
        check_port(
            model,
            &signal.name,
            &signal.target,
            "target",
            "Input or Diagnostic",
            PortKind::can_sink,
            out,
        );
    }

    for pdu in model.com_stack().iter() {
        if !model.signals().contains(&pdu.signal) {
            out.push(Violation::new(
                ViolationKind::DanglingReference,
                vec![pdu.name.clone(), pdu.signal.clone()],
                format!("PDU {} carries unknown signal {}", pdu.name, pdu.signal),
            ));
        }
    }

    for task in model.scheduler().iter() {
        if !model.components().contains(&task.component) {
            out.push(Violation::new(
                ViolationKind::DanglingReference,
                vec![task.name.clone(), task.component.clone()],
                format!("task {} runs unknown component {}", task.name, task.component),
            ));
        }
    }

    for state in model.safety().iter() {
        check_port(
            model,
            model.safety().name(),
            &state.port,
            "safe state port",
            "Output",
            |k| k == PortKind::Output,
            out,
        );
    }

    for service in model.diagnostics().iter() {
        let owner = service.request.to_string();
        for (role, port) in [("request", &service.request), ("response", &service.response)] {
            check_port(
                model,
                &owner,
                port,
                role,
                "Diagnostic",
                |k| k == PortKind::Diagnostic,
                out,
            );
        }
        for ecu in service.ecus.iter().filter(|e| !model.ecus().contains_ecu(e)) {
            out.push(Violation::new(
                ViolationKind::DanglingReference,
                vec![owner.clone(), ecu.clone()],
                format!("UDS service {} is served by unknown ECU {}", owner, ecu),
            ));
        }
    }
}

fn check_placement(model: &Architecture, out: &mut Vec<Violation>) {
    for component in model.components().iter() {
        let hosts: Vec<&str> = model
            .ecus()
            .iter()
            .filter(|ecu| ecu.hosts(&component.name))
            .map(|ecu| ecu.name.as_str())
            .collect();

        match hosts.len() {
            1 => {}
            0 => out.push(Violation::new(
                ViolationKind::UnassignedComponent,
                vec![component.name.clone()],
                format!("component {} is not assigned to any ECU", component.name),
            )),
            _ => out.push(Violation::new(
                ViolationKind::MultipleAssignment,
                vec![component.name.clone()],
                format!(
                    "component {} is assigned to {} ECUs: {}",
                    component.name,
                    hosts.len(),
                    hosts.join(", ")
                ),
            )),
        }
    }
}

fn check_priority_slots(model: &Architecture, out: &mut Vec<Violation>) {
    for conflict in model.scheduler().conflicts() {
        let mut tasks = conflict.tasks.clone();
        tasks.sort();
        out.push(Violation::new(
            ViolationKind::PriorityConflict,
            tasks.clone(),
            format!(
                "tasks {} share priority {} on core {}",
                tasks.join(", "),
                conflict.priority,
                conflict.core
            ),
        ));
    }
}

/// Ports fed by the Output-port signals of `component`
fn output_targets(model: &Architecture, component: &str) -> BTreeSet<PortRef> {
    model
        .signals()
        .signals_from(component)
        .filter(|s| {
            model
                .components()
                .resolve_port(&s.source)
                .map(|p| p.kind == PortKind::Output)
                .unwrap_or(false)
        })
        .map(|s| s.target.clone())
        .collect()
}

fn check_redundancy(model: &Architecture, out: &mut Vec<Violation>) {
    for RedundancyPair { primary, redundant } in model.redundancy_pairs() {
        let primary_targets = output_targets(model, &primary);
        let redundant_targets = output_targets(model, &redundant);
        if primary_targets.is_empty() && redundant_targets.is_empty() {
            out.push(Violation::new(
                ViolationKind::IncompleteRedundancy,
                vec![primary.clone(), redundant.clone()],
                format!(
                    "neither {} nor {} routes an Output signal downstream",
                    primary, redundant
                ),
            ));
            continue;
        }
        if primary_targets == redundant_targets {
            continue;
        }

        let describe = |targets: BTreeSet<&PortRef>| {
            if targets.is_empty() {
                "-".to_string()
            } else {
                targets
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };
        let only_primary = describe(primary_targets.difference(&redundant_targets).collect());
        let only_redundant = describe(redundant_targets.difference(&primary_targets).collect());

        out.push(Violation::new(
            ViolationKind::IncompleteRedundancy,
            vec![primary.clone(), redundant.clone()],
            format!(
                "{} and {} route outputs differently (only {}: {}; only {}: {})",
                primary, redundant, primary, only_primary, redundant, only_redundant
            ),
        ));
    }
}

fn check_uds_placement(model: &Architecture, out: &mut Vec<Violation>) {
    for service in model.diagnostics().iter() {
        for port in [&service.request, &service.response] {
            let hosted = model
                .ecus()
                .ecu_of(&port.component)
                .map(|ecu| service.ecus.contains(ecu))
                .unwrap_or(false);
            if !hosted {
                out.push(Violation::new(
                    ViolationKind::UdsPlacement,
                    vec![port.to_string(), port.component.clone()],
                    format!(
                        "UDS port {} is not hosted by any serving ECU ({})",
                        port,
                        service.ecus.iter().cloned().collect::<Vec<_>>().join(", ")
                    ),
                ));
            }
        }
    }
}
