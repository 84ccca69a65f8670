//! Entry point tying configuration and transport together.

use std::sync::Arc;

use crate::service::{Service, Transport};
use crate::{Config, Result};

/// Hands out [`Service`]s that share one config and transport.
#[derive(Clone)]
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Client using the config found by [`Config::load`].
    pub fn from_environment(transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::new(Config::load()?, transport))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A service by name, with or without the `SoftLayer_` prefix.
    pub fn service(&self, name: &str) -> Service {
        Service::new(name, self.config.clone(), Arc::clone(&self.transport))
    }
}
