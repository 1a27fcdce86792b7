//! Crypto/safety layer of the communication stack

use tracing::{info, warn};

use super::StackConfigurator;
use crate::models::CryptoConfig;

/// Default name of the crypto stack
pub const DEFAULT_CRYPTO_STACK: &str = "UltimateCryptoStack";

#[derive(Debug, Clone)]
pub struct SecurityConfigurator {
    name: String,
    config: Option<CryptoConfig>,
}

impl Default for SecurityConfigurator {
    fn default() -> Self {
        Self::new(DEFAULT_CRYPTO_STACK)
    }
}

impl SecurityConfigurator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the authentication, key-exchange and integrity policy for `stack`
    ///
    /// Last write wins; overriding an existing policy is logged.
    pub fn configure(
        &mut self,
        stack: &StackConfigurator,
        key_id: &str,
        mac_algorithm: &str,
        key_exchange: &str,
        integrity_algorithm: &str,
    ) -> &CryptoConfig {
        let config = CryptoConfig {
            stack: stack.name().to_string(),
            key_id: key_id.to_string(),
            mac_algorithm: mac_algorithm.to_string(),
            key_exchange: key_exchange.to_string(),
            integrity_algorithm: integrity_algorithm.to_string(),
        };

        if let Some(previous) = &self.config {
            warn!(
                crypto_stack = %self.name,
                previous_key = %previous.key_id,
                key = %key_id,
                "Overriding crypto configuration"
            );
        } else {
            info!(
                crypto_stack = %self.name,
                stack = %config.stack,
                mac = %mac_algorithm,
                key_exchange = %key_exchange,
                integrity = %integrity_algorithm,
                "Configured crypto stack"
            );
        }

        self.config.insert(config)
    }

    pub fn config(&self) -> Option<&CryptoConfig> {
        self.config.as_ref()
    }
}
