//! Show command - list what an architecture contains

use anyhow::Result;
use eea_core::{Architecture, PortKind, SoftwareComponent};
use serde::Serialize;
use std::path::Path;

use crate::output::{join_or_dash, ComponentRow, EcuRow, OutputContext, TaskRow};

#[derive(Serialize)]
struct ShowDocument<'a> {
    project: &'a str,
    components: Vec<ComponentRow>,
    ecus: Vec<EcuRow>,
    tasks: Vec<TaskRow>,
}

/// Build the definition and print its components, ECUs and tasks
///
/// The model is not validated, so incomplete definitions can be inspected.
pub fn show(definition: Option<&Path>, ctx: &OutputContext) -> Result<()> {
    let definition = super::load_definition(definition)?;
    let arch = super::build(&definition)?;

    let document = ShowDocument {
        project: arch.project(),
        components: arch.components().iter().map(|c| component_row(&arch, c)).collect(),
        ecus: arch
            .ecus()
            .iter()
            .map(|e| EcuRow {
                name: e.name.clone(),
                components: join_or_dash(e.components.iter().map(String::as_str)),
            })
            .collect(),
        tasks: arch
            .scheduler()
            .iter()
            .map(|t| TaskRow {
                name: t.name.clone(),
                priority: t.priority,
                core: t.core,
                component: t.component.clone(),
            })
            .collect(),
    };

    if ctx.is_json() {
        ctx.print_json(&document);
        return Ok(());
    }

    ctx.info(&format!("Project: {}", document.project));
    ctx.heading("Components");
    ctx.print(&document.components);
    ctx.heading("ECUs");
    ctx.print(&document.ecus);
    ctx.heading("Tasks");
    ctx.print(&document.tasks);
    Ok(())
}

fn component_row(arch: &Architecture, component: &SoftwareComponent) -> ComponentRow {
    let ports = |kind| join_or_dash(component.ports_of_kind(kind).map(|p| p.name.as_str()));
    ComponentRow {
        name: component.name.clone(),
        inputs: ports(PortKind::Input),
        outputs: ports(PortKind::Output),
        diagnostic: ports(PortKind::Diagnostic),
        ecu: arch
            .ecus()
            .ecu_of(&component.name)
            .unwrap_or("-")
            .to_string(),
    }
}
