//! Protocol data unit models

use serde::{Deserialize, Serialize};

/// Bus protocol carrying a PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "can", alias = "CAN")]
    Can,
    #[serde(rename = "ethernet", alias = "Ethernet", alias = "eth")]
    Ethernet,
    #[serde(rename = "lin", alias = "LIN")]
    Lin,
}

impl Protocol {
    /// All protocols in a fixed order
    pub const ALL: [Protocol; 3] = [Protocol::Can, Protocol::Ethernet, Protocol::Lin];
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Protocol::Can => "CAN",
            Protocol::Ethernet => "Ethernet",
            Protocol::Lin => "LIN",
        };
        f.write_str(s)
    }
}

/// A PDU carrying one signal over one protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pdu {
    pub name: String,
    pub protocol: Protocol,
    /// Name of the carried signal
    pub signal: String,
}
