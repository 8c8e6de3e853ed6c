//! The service's server.
//!
//! # Responsibilities
//! - Carry the service identity (name, version, id) and addresses
//! - Describe itself for discovery
//!
//! # Design Decisions
//! - One implementation only; there is no kind lookup for servers
//! - An empty id is replaced with a random UUID at construction

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::components::broker::Broker;
use crate::components::registry::Registry;
use crate::components::transport::Transport;

/// Configuration setters for [`Server`].
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub name: String,
    pub version: String,
    pub id: String,
    pub address: String,
    pub advertise: String,
    pub metadata: HashMap<String, String>,
    pub broker: Option<Arc<dyn Broker>>,
    pub registry: Option<Arc<dyn Registry>>,
    pub transport: Option<Arc<dyn Transport>>,
}

impl ServerOptions {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Bind address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Address registered with discovery instead of the bind address.
    pub fn advertise(mut self, advertise: impl Into<String>) -> Self {
        self.advertise = advertise.into();
        self
    }

    pub fn metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn broker(mut self, broker: Option<Arc<dyn Broker>>) -> Self {
        self.broker = broker;
        self
    }

    pub fn registry(mut self, registry: Option<Arc<dyn Registry>>) -> Self {
        self.registry = registry;
        self
    }

    pub fn transport(mut self, transport: Option<Arc<dyn Transport>>) -> Self {
        self.transport = transport;
        self
    }
}

/// What the server publishes about itself to discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub id: String,
    pub address: String,
    pub metadata: HashMap<String, String>,
}

/// The process's server.
#[derive(Debug, Clone)]
pub struct Server {
    opts: ServerOptions,
}

impl Server {
    pub fn new(mut opts: ServerOptions) -> Self {
        if opts.id.is_empty() {
            opts.id = Uuid::new_v4().to_string();
        }
        Self { opts }
    }

    pub fn options(&self) -> &ServerOptions {
        &self.opts
    }

    /// Address other services should dial: the advertise address when set,
    /// the bind address otherwise.
    pub fn advertised_address(&self) -> &str {
        if self.opts.advertise.is_empty() {
            &self.opts.address
        } else {
            &self.opts.advertise
        }
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.opts.name.clone(),
            version: self.opts.version.clone(),
            id: self.opts.id.clone(),
            address: self.advertised_address().to_string(),
            metadata: self.opts.metadata.clone(),
        }
    }
}
