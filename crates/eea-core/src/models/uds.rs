//! UDS diagnostic service bindings

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::refs::PortRef;

/// A UDS request/response service served by one or more ECUs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdsService {
    pub request: PortRef,
    pub response: PortRef,
    /// ECUs answering this service
    pub ecus: BTreeSet<String>,
}
