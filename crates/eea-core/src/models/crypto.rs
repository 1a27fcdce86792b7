//! Crypto and error-detection configuration

use serde::{Deserialize, Serialize};

/// Authentication, key-management and integrity policy of a communication stack
///
/// Only names the primitives; nothing here implements them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Communication stack this policy applies to
    pub stack: String,
    /// Key identifier (e.g., "SecureKey")
    pub key_id: String,
    /// Message authentication algorithm (e.g., "HMAC")
    pub mac_algorithm: String,
    /// Key exchange scheme (e.g., "StartupKeyExchange")
    pub key_exchange: String,
    /// Error-detection checksum (e.g., "CRC32")
    pub integrity_algorithm: String,
}
