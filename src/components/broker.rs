//! Message broker for pub/sub.

use std::fmt;
use std::sync::Arc;

/// A pub/sub broker as seen by the bootstrap layer.
pub trait Broker: Send + Sync + fmt::Debug {
    /// Kind identifier this broker was registered under.
    fn kind(&self) -> &str;

    /// Addresses the broker was constructed with, in flag order.
    fn addresses(&self) -> &[String];
}

/// Constructor for a broker kind, fed the split `broker_address` list.
pub type BrokerFactory = Arc<dyn Fn(Vec<String>) -> Arc<dyn Broker> + Send + Sync>;

/// Built-in `http` broker.
#[derive(Debug, Clone, Default)]
pub struct HttpBroker {
    addresses: Vec<String>,
}

impl HttpBroker {
    pub fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    /// Factory registered under `"http"` by default.
    pub fn factory() -> BrokerFactory {
        Arc::new(|addresses| Arc::new(HttpBroker::new(addresses)) as Arc<dyn Broker>)
    }
}

impl Broker for HttpBroker {
    fn kind(&self) -> &str {
        "http"
    }

    fn addresses(&self) -> &[String] {
        &self.addresses
    }
}
