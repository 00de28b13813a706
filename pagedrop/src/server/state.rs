//! Server state

use secrecy::SecretString;

use crate::deploy::orchestrator::Deployer;
use crate::notifier::Notifier;

/// Server state shared across handlers
pub struct ServerState {
    pub deployer: Deployer,
    pub notifier: Notifier,
    pub secret: SecretString,
}

impl ServerState {
    pub fn new(deployer: Deployer, notifier: Notifier, secret: SecretString) -> Self {
        Self {
            deployer,
            notifier,
            secret,
        }
    }
}
