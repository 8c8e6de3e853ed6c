//! Service registry for discovery.

use std::fmt;
use std::sync::Arc;

/// A discovery registry as seen by the bootstrap layer.
pub trait Registry: Send + Sync + fmt::Debug {
    /// Kind identifier this registry was registered under.
    fn kind(&self) -> &str;

    /// Addresses the registry was constructed with, in flag order.
    fn addresses(&self) -> &[String];
}

/// Constructor for a registry kind, fed the split `registry_address` list.
pub type RegistryFactory = Arc<dyn Fn(Vec<String>) -> Arc<dyn Registry> + Send + Sync>;

/// Built-in `consul` registry.
#[derive(Debug, Clone, Default)]
pub struct ConsulRegistry {
    addresses: Vec<String>,
}

impl ConsulRegistry {
    pub fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    /// Factory registered under `"consul"` by default.
    pub fn factory() -> RegistryFactory {
        Arc::new(|addresses| Arc::new(ConsulRegistry::new(addresses)) as Arc<dyn Registry>)
    }
}

impl Registry for ConsulRegistry {
    fn kind(&self) -> &str {
        "consul"
    }

    fn addresses(&self) -> &[String] {
        &self.addresses
    }
}
