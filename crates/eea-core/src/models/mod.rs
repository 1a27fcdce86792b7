//! Shared data models for architecture descriptions

mod component;
mod crypto;
mod ecu;
mod pdu;
mod port;
mod safety;
mod signal;
mod task;
mod uds;

pub use component::*;
pub use crypto::*;
pub use ecu::*;
pub use pdu::*;
pub use port::*;
pub use safety::*;
pub use signal::*;
pub use task::*;
pub use uds::*;
