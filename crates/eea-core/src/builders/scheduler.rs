//! OS task scheduling across cores

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{info, warn};

use super::{ComponentRegistry, EcuAssignment};
use crate::error::{ArchError, ArchResult};
use crate::models::Task;

/// Two or more tasks sharing one (core, priority) slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotConflict {
    pub core: u32,
    pub priority: u32,
    /// Task names in the order they were added
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    names: HashSet<String>,
    /// (core, priority) -> task names
    slots: BTreeMap<(u32, u32), Vec<String>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task running `component` on `core` at `priority`
    ///
    /// The component must already be placed on an ECU. Sharing a
    /// (core, priority) slot is accepted but logged.
    pub fn add_task(
        &mut self,
        registry: &ComponentRegistry,
        assignment: &EcuAssignment,
        name: &str,
        priority: u32,
        core: u32,
        component: &str,
    ) -> ArchResult<&Task> {
        registry.lookup(component)?;
        let ecu = assignment
            .ecu_of(component)
            .ok_or_else(|| ArchError::UnscheduledComponent(component.to_string()))?;
        if priority == 0 {
            return Err(ArchError::InvalidPriority {
                task: name.to_string(),
                priority,
            });
        }
        if !self.names.insert(name.to_string()) {
            return Err(ArchError::DuplicateName {
                kind: "task",
                name: name.to_string(),
            });
        }

        let slot = self.slots.entry((core, priority)).or_default();
        if !slot.is_empty() {
            warn!(
                task = %name,
                core,
                priority,
                sharing_with = ?slot,
                "Task shares a core/priority slot"
            );
        }
        slot.push(name.to_string());

        info!(task = %name, %component, %ecu, core, priority, "Added task");
        self.tasks.push(Task {
            name: name.to_string(),
            priority,
            core,
            component: component.to_string(),
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Slots claimed by more than one task, ordered by core then priority
    pub fn conflicts(&self) -> Vec<SlotConflict> {
        self.slots
            .iter()
            .filter(|(_, tasks)| tasks.len() > 1)
            .map(|(&(core, priority), tasks)| SlotConflict {
                core,
                priority,
                tasks: tasks.clone(),
            })
            .collect()
    }

    /// Tasks pinned to a core, highest priority first
    pub fn tasks_on_core(&self, core: u32) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|t| t.core == core).collect();
        tasks.sort_by_key(|t| t.priority);
        tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ComponentRegistry, EcuAssignment) {
        let mut registry = ComponentRegistry::default();
        registry
            .add_component("SteeringController", ["TorqueOutput"])
            .unwrap();
        registry
            .add_component("SensorFusion", ["ProcessedSensorOutput"])
            .unwrap();
        registry
            .add_component("Gateway", ["CANInput", "CANOutput"])
            .unwrap();
        let mut assignment = EcuAssignment::new();
        assignment
            .assign(&registry, "SteeringECU", "SteeringController")
            .unwrap();
        assignment
            .assign(&registry, "SensorFusionECU", "SensorFusion")
            .unwrap();
        (registry, assignment)
    }

    #[test]
    fn test_task_before_assignment() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        let err = scheduler
            .add_task(&registry, &assignment, "GatewayTask", 3, 1, "Gateway")
            .unwrap_err();
        assert!(matches!(err, ArchError::UnscheduledComponent(ref c) if c == "Gateway"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_unknown_component() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        assert!(matches!(
            scheduler.add_task(&registry, &assignment, "GhostTask", 1, 0, "Ghost"),
            Err(ArchError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_zero_priority() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        assert!(matches!(
            scheduler.add_task(&registry, &assignment, "SteeringControlTask", 0, 0, "SteeringController"),
            Err(ArchError::InvalidPriority { priority: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_task_name() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_task(&registry, &assignment, "SteeringControlTask", 1, 0, "SteeringController")
            .unwrap();
        assert!(matches!(
            scheduler.add_task(&registry, &assignment, "SteeringControlTask", 2, 1, "SensorFusion"),
            Err(ArchError::DuplicateName { kind: "task", .. })
        ));
    }

    #[test]
    fn test_shared_slot_is_reported() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_task(&registry, &assignment, "SteeringControlTask", 1, 0, "SteeringController")
            .unwrap();
        scheduler
            .add_task(&registry, &assignment, "SensorFusionTask", 1, 0, "SensorFusion")
            .unwrap();

        assert_eq!(
            scheduler.conflicts(),
            vec![SlotConflict {
                core: 0,
                priority: 1,
                tasks: vec![
                    "SteeringControlTask".to_string(),
                    "SensorFusionTask".to_string()
                ],
            }]
        );
    }

    #[test]
    fn test_tasks_on_core_sorted() {
        let (registry, assignment) = setup();
        let mut scheduler = Scheduler::new();
        scheduler
            .add_task(&registry, &assignment, "SensorFusionTask", 2, 0, "SensorFusion")
            .unwrap();
        scheduler
            .add_task(&registry, &assignment, "SteeringControlTask", 1, 0, "SteeringController")
            .unwrap();
        let names: Vec<&str> = scheduler
            .tasks_on_core(0)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["SteeringControlTask", "SensorFusionTask"]);
        assert!(scheduler.conflicts().is_empty());
    }
}
