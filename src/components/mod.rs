//! Pluggable infrastructure components.
//!
//! # Data Flow
//! ```text
//! Options registries (kind → factory)
//!     → broker.rs     (pub/sub)
//!     → registry.rs   (service discovery)
//!     → selector.rs   (node selection, reads the registry)
//!     → transport.rs  (point-to-point messaging)
//!     → server.rs     (single implementation, no kind lookup)
//!     → client.rs     (single implementation, no kind lookup)
//! ```
//!
//! # Design Decisions
//! - Kind-selected components are trait objects shared via `Arc`
//! - Built-in kinds are descriptors (kind + addresses); networking and
//!   discovery live in the concrete implementations
//! - Factories are plain closures keyed by kind identifier

use std::fmt;

use serde::Serialize;

pub mod broker;
pub mod client;
pub mod registry;
pub mod selector;
pub mod server;
pub mod transport;

pub use broker::{Broker, BrokerFactory, HttpBroker};
pub use client::{Client, ClientOptions};
pub use registry::{ConsulRegistry, Registry, RegistryFactory};
pub use selector::{RandomSelector, Selector, SelectorFactory};
pub use server::{Server, ServerOptions, ServiceInfo};
pub use transport::{HttpTransport, Transport, TransportFactory};

/// The component kinds chosen by name at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Broker,
    Registry,
    Selector,
    Transport,
}

impl Component {
    /// Flag that carries the kind identifier for this component.
    pub fn flag(self) -> &'static str {
        match self {
            Component::Broker => "broker",
            Component::Registry => "registry",
            Component::Selector => "selector",
            Component::Transport => "transport",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}
