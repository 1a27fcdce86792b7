//! OS task models

use serde::{Deserialize, Serialize};

/// Real-time task running one software component on one core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Lower value runs first; starts at 1
    pub priority: u32,
    pub core: u32,
    /// Bound component name
    pub component: String,
}
