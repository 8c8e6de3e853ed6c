//! Point-to-point transport.

use std::fmt;
use std::sync::Arc;

/// A request/response transport as seen by the bootstrap layer.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Kind identifier this transport was registered under.
    fn kind(&self) -> &str;

    /// Addresses the transport was constructed with, in flag order.
    fn addresses(&self) -> &[String];
}

/// Constructor for a transport kind, fed the split `transport_address` list.
pub type TransportFactory = Arc<dyn Fn(Vec<String>) -> Arc<dyn Transport> + Send + Sync>;

/// Built-in `http` transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    addresses: Vec<String>,
}

impl HttpTransport {
    pub fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    /// Factory registered under `"http"` by default.
    pub fn factory() -> TransportFactory {
        Arc::new(|addresses| Arc::new(HttpTransport::new(addresses)) as Arc<dyn Transport>)
    }
}

impl Transport for HttpTransport {
    fn kind(&self) -> &str {
        "http"
    }

    fn addresses(&self) -> &[String] {
        &self.addresses
    }
}
