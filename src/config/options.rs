//! The Option Set: service identity plus one factory table per component kind.
//!
//! Built once from a base seeded with the built-in kinds, then mutated only by
//! the option functions handed to [`Options::new`] or [`Options::apply`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::components::{
    Broker, BrokerFactory, ConsulRegistry, HttpBroker, HttpTransport, RandomSelector, Registry,
    RegistryFactory, Selector, SelectorFactory, Transport, TransportFactory,
};

/// Description assigned when no option sets one.
pub const DEFAULT_DESCRIPTION: &str = "a micro service";

/// A single option function.
pub type Opt = Box<dyn FnOnce(&mut Options)>;

/// Resolved command options.
#[derive(Clone)]
pub struct Options {
    pub name: String,
    pub version: String,
    pub description: String,

    pub brokers: HashMap<String, BrokerFactory>,
    pub registries: HashMap<String, RegistryFactory>,
    pub selectors: HashMap<String, SelectorFactory>,
    pub transports: HashMap<String, TransportFactory>,

    /// Abort bootstrap when a requested kind has no factory, instead of
    /// leaving that component's default untouched.
    pub strict_kinds: bool,
}

impl Options {
    /// Build options from the built-in base and `opts`, applied in order.
    pub fn new(opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut options = Self::base();
        options.apply(opts);
        if options.description.is_empty() {
            options.description = DEFAULT_DESCRIPTION.to_string();
        }
        options
    }

    /// Apply further option functions in order.
    pub fn apply(&mut self, opts: impl IntoIterator<Item = Opt>) {
        for opt in opts {
            opt(self);
        }
    }

    fn base() -> Self {
        Self {
            name: String::new(),
            version: String::new(),
            description: String::new(),
            brokers: HashMap::from([("http".to_string(), HttpBroker::factory())]),
            registries: HashMap::from([("consul".to_string(), ConsulRegistry::factory())]),
            selectors: HashMap::from([("random".to_string(), RandomSelector::factory())]),
            transports: HashMap::from([("http".to_string(), HttpTransport::factory())]),
            strict_kinds: false,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn kinds<V>(table: &HashMap<String, V>) -> Vec<&str> {
            let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
            keys.sort_unstable();
            keys
        }

        f.debug_struct("Options")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("description", &self.description)
            .field("brokers", &kinds(&self.brokers))
            .field("registries", &kinds(&self.registries))
            .field("selectors", &kinds(&self.selectors))
            .field("transports", &kinds(&self.transports))
            .field("strict_kinds", &self.strict_kinds)
            .finish()
    }
}

pub fn name(name: impl Into<String>) -> Opt {
    let name = name.into();
    Box::new(move |o| o.name = name)
}

pub fn version(version: impl Into<String>) -> Opt {
    let version = version.into();
    Box::new(move |o| o.version = version)
}

pub fn description(description: impl Into<String>) -> Opt {
    let description = description.into();
    Box::new(move |o| o.description = description)
}

/// Register a broker factory under `kind`, replacing an existing one.
pub fn broker<F>(kind: impl Into<String>, factory: F) -> Opt
where
    F: Fn(Vec<String>) -> Arc<dyn Broker> + Send + Sync + 'static,
{
    let kind = kind.into();
    Box::new(move |o| {
        o.brokers.insert(kind, Arc::new(factory));
    })
}

/// Register a registry factory under `kind`, replacing an existing one.
pub fn registry<F>(kind: impl Into<String>, factory: F) -> Opt
where
    F: Fn(Vec<String>) -> Arc<dyn Registry> + Send + Sync + 'static,
{
    let kind = kind.into();
    Box::new(move |o| {
        o.registries.insert(kind, Arc::new(factory));
    })
}

/// Register a selector factory under `kind`, replacing an existing one.
pub fn selector<F>(kind: impl Into<String>, factory: F) -> Opt
where
    F: Fn(Option<Arc<dyn Registry>>) -> Arc<dyn Selector> + Send + Sync + 'static,
{
    let kind = kind.into();
    Box::new(move |o| {
        o.selectors.insert(kind, Arc::new(factory));
    })
}

/// Register a transport factory under `kind`, replacing an existing one.
pub fn transport<F>(kind: impl Into<String>, factory: F) -> Opt
where
    F: Fn(Vec<String>) -> Arc<dyn Transport> + Send + Sync + 'static,
{
    let kind = kind.into();
    Box::new(move |o| {
        o.transports.insert(kind, Arc::new(factory));
    })
}

/// Replace the whole broker table.
pub fn brokers(table: HashMap<String, BrokerFactory>) -> Opt {
    Box::new(move |o| o.brokers = table)
}

/// Replace the whole registry table.
pub fn registries(table: HashMap<String, RegistryFactory>) -> Opt {
    Box::new(move |o| o.registries = table)
}

/// Replace the whole selector table.
pub fn selectors(table: HashMap<String, SelectorFactory>) -> Opt {
    Box::new(move |o| o.selectors = table)
}

/// Replace the whole transport table.
pub fn transports(table: HashMap<String, TransportFactory>) -> Opt {
    Box::new(move |o| o.transports = table)
}

/// Treat unknown kind identifiers as a bootstrap failure.
pub fn strict_kinds() -> Opt {
    Box::new(|o| o.strict_kinds = true)
}
