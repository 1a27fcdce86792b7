//! Component registry - owns every software component and its ports

use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{ArchError, ArchResult};
use crate::models::{Port, PortKind, SoftwareComponent};
use crate::refs::PortRef;

/// Registry of software components, in registration order
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    catalog: Catalog,
    components: Vec<SoftwareComponent>,
    /// Component name -> position in `components`
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            components: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Register a component with its ports
    ///
    /// Every port is classified through the catalog before anything is
    /// stored, so a rejected component leaves the registry untouched.
    pub fn add_component<I, S>(&mut self, name: &str, port_names: I) -> ArchResult<&SoftwareComponent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.index.contains_key(name) {
            return Err(ArchError::DuplicateName {
                kind: "component",
                name: name.to_string(),
            });
        }

        let mut component = SoftwareComponent::new(name);
        for port_name in port_names {
            let port_name = port_name.as_ref();
            if component.has_port(port_name) {
                return Err(ArchError::DuplicateName {
                    kind: "port",
                    name: format!("{}.{}", name, port_name),
                });
            }
            let kind = self.port_kind_of(port_name)?;
            component.ports.push(Port {
                name: port_name.to_string(),
                kind,
            });
        }

        info!(
            component = %name,
            ports = component.ports.len(),
            "Registered software component"
        );

        let idx = self.components.len();
        self.index.insert(name.to_string(), idx);
        self.components.push(component);
        Ok(&self.components[idx])
    }

    /// Add a port to an already registered component
    pub fn add_port(&mut self, component: &str, port_name: &str) -> ArchResult<&Port> {
        let kind = self.port_kind_of(port_name)?;
        let idx = *self
            .index
            .get(component)
            .ok_or_else(|| ArchError::UnknownComponent(component.to_string()))?;

        let swc = &mut self.components[idx];
        if swc.has_port(port_name) {
            return Err(ArchError::DuplicateName {
                kind: "port",
                name: format!("{}.{}", component, port_name),
            });
        }
        debug!(component = %component, port = %port_name, %kind, "Added port");
        swc.ports.push(Port {
            name: port_name.to_string(),
            kind,
        });
        Ok(&swc.ports[swc.ports.len() - 1])
    }

    /// Kind a port with this name would get
    pub fn port_kind_of(&self, port_name: &str) -> ArchResult<PortKind> {
        self.catalog.classify(port_name)
    }

    /// Look up a component by name
    pub fn lookup(&self, name: &str) -> ArchResult<&SoftwareComponent> {
        self.get(name)
            .ok_or_else(|| ArchError::UnknownComponent(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&SoftwareComponent> {
        self.index.get(name).map(|&idx| &self.components[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a `Component.Port` reference
    ///
    /// Both a missing component and a missing port are reported as a
    /// dangling reference.
    pub fn resolve_port(&self, port_ref: &PortRef) -> ArchResult<&Port> {
        self.get(&port_ref.component)
            .and_then(|swc| swc.port(&port_ref.port))
            .ok_or_else(|| ArchError::DanglingReference(port_ref.to_string()))
    }

    /// Components in registration order
    pub fn iter(&self) -> impl Iterator<Item = &SoftwareComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
