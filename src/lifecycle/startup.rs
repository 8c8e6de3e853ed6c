//! Startup orchestration.
//!
//! # Responsibilities
//! - Configure logging from the forwarded logging flags
//! - Resolve broker, registry, selector and transport by kind identifier
//! - Build the server and client from what resolved
//! - Publish the result as the process-wide defaults
//!
//! # Order
//! ```text
//! logging → broker → registry → selector(registry) → transport
//!         → metadata → server → client → publish
//! ```
//!
//! # Design Decisions
//! - Each stage hands its typed result forward; the selector receives the
//!   registry from the registry stage, not from the global slot
//! - An unknown kind leaves the prior default in place and is recorded in
//!   the report; strict mode turns it into an error
//! - Server and client are always built

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::components::{
    Broker, Client, ClientOptions, Component, Registry, Selector, Server, ServerOptions, Transport,
};
use crate::config::{Flags, Options};
use crate::defaults::{self, Defaults};
use crate::error::BootstrapError;
use crate::observability::LogConfig;

/// Outcome of looking up one kind identifier.
#[derive(Debug)]
pub enum Resolution<T: ?Sized> {
    Resolved { kind: String, instance: Arc<T> },
    Unresolved { kind: String },
}

impl<T: ?Sized> Resolution<T> {
    pub fn kind(&self) -> &str {
        match self {
            Resolution::Resolved { kind, .. } | Resolution::Unresolved { kind } => kind,
        }
    }

    pub fn instance(&self) -> Option<&Arc<T>> {
        match self {
            Resolution::Resolved { instance, .. } => Some(instance),
            Resolution::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

impl<T: ?Sized> Clone for Resolution<T> {
    fn clone(&self) -> Self {
        match self {
            Resolution::Resolved { kind, instance } => Resolution::Resolved {
                kind: kind.clone(),
                instance: instance.clone(),
            },
            Resolution::Unresolved { kind } => Resolution::Unresolved { kind: kind.clone() },
        }
    }
}

/// What happened to one kind-selected component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindOutcome {
    pub component: Component,
    pub kind: String,
    pub resolved: bool,
}

/// Per-component outcomes, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub outcomes: Vec<KindOutcome>,
    pub metadata: HashMap<String, String>,
}

impl BootstrapReport {
    pub fn outcome(&self, component: Component) -> Option<&KindOutcome> {
        self.outcomes.iter().find(|o| o.component == component)
    }

    /// Components whose kind identifier matched no factory.
    pub fn unresolved(&self) -> impl Iterator<Item = &KindOutcome> {
        self.outcomes.iter().filter(|o| !o.resolved)
    }

    fn record<T: ?Sized>(&mut self, component: Component, resolution: &Resolution<T>) {
        self.outcomes.push(KindOutcome {
            component,
            kind: resolution.kind().to_string(),
            resolved: resolution.is_resolved(),
        });
    }
}

/// Result of a bootstrap run.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    pub defaults: Arc<Defaults>,
    pub report: BootstrapReport,
}

/// Look `kind` up in `table` and build it with `build` when present.
fn resolve_kind<F: ?Sized, T: ?Sized>(
    component: Component,
    table: &HashMap<String, Arc<F>>,
    kind: &str,
    strict: bool,
    build: impl FnOnce(&F) -> Arc<T>,
) -> Result<Resolution<T>, BootstrapError> {
    if let Some(factory) = table.get(kind) {
        tracing::debug!(component = %component, kind = %kind, "Resolved component kind");
        return Ok(Resolution::Resolved {
            kind: kind.to_string(),
            instance: build(factory),
        });
    }

    let mut registered: Vec<String> = table.keys().cloned().collect();
    registered.sort_unstable();
    if strict {
        return Err(BootstrapError::UnknownKind {
            component,
            kind: kind.to_string(),
            registered,
        });
    }
    tracing::warn!(component = %component, kind = %kind, registered = ?registered, "No factory for kind; keeping previous default");
    Ok(Resolution::Unresolved {
        kind: kind.to_string(),
    })
}

/// Resolve and construct every component without touching global state.
///
/// Slots whose kind does not resolve keep the value from `prior`.
pub fn resolve(
    options: &Options,
    flags: &Flags,
    prior: &Defaults,
) -> Result<Bootstrapped, BootstrapError> {
    let strict = options.strict_kinds;
    let mut report = BootstrapReport::default();

    let broker: Resolution<dyn Broker> =
        resolve_kind(Component::Broker, &options.brokers, &flags.broker, strict, |f| {
            f(flags.broker_addresses())
        })?;
    report.record(Component::Broker, &broker);

    let registry: Resolution<dyn Registry> =
        resolve_kind(Component::Registry, &options.registries, &flags.registry, strict, |f| {
            f(flags.registry_addresses())
        })?;
    report.record(Component::Registry, &registry);
    let registry_in_effect = registry.instance().cloned().or_else(|| prior.registry.clone());

    let selector: Resolution<dyn Selector> =
        resolve_kind(Component::Selector, &options.selectors, &flags.selector, strict, |f| {
            f(registry_in_effect.clone())
        })?;
    report.record(Component::Selector, &selector);

    let transport: Resolution<dyn Transport> =
        resolve_kind(Component::Transport, &options.transports, &flags.transport, strict, |f| {
            f(flags.transport_addresses())
        })?;
    report.record(Component::Transport, &transport);

    let broker = broker.instance().cloned().or_else(|| prior.broker.clone());
    let selector = selector.instance().cloned().or_else(|| prior.selector.clone());
    let transport = transport.instance().cloned().or_else(|| prior.transport.clone());

    let metadata = flags.metadata();
    report.metadata = metadata.clone();

    let server = Server::new(
        ServerOptions::default()
            .name(flags.server_name.as_str())
            .version(flags.server_version.as_str())
            .id(flags.server_id.as_str())
            .address(flags.server_address.as_str())
            .advertise(flags.server_advertise.as_str())
            .metadata(metadata)
            .broker(broker.clone())
            .registry(registry_in_effect.clone())
            .transport(transport.clone()),
    );
    tracing::info!(
        name = %server.options().name,
        id = %server.options().id,
        address = %server.options().address,
        "Server configured"
    );

    let client = Client::new(ClientOptions {
        broker: broker.clone(),
        selector: selector.clone(),
        transport: transport.clone(),
    });

    Ok(Bootstrapped {
        defaults: Arc::new(Defaults {
            broker,
            registry: registry_in_effect,
            selector,
            transport,
            server: Some(Arc::new(server)),
            client: Some(Arc::new(client)),
        }),
        report,
    })
}

/// The pre-run hook: configure logging, resolve, then publish.
pub fn bootstrap(
    options: &Options,
    flags: &Flags,
    program: &str,
) -> Result<Bootstrapped, BootstrapError> {
    LogConfig::from_flags(&flags.log).install(program);

    let prior = defaults::current();
    let resolved = resolve(options, flags, &prior)?;
    let published = defaults::publish(Defaults::clone(&resolved.defaults));

    let unresolved = resolved.report.unresolved().count();
    tracing::info!(unresolved, "Bootstrap complete");
    Ok(Bootstrapped {
        defaults: published,
        report: resolved.report,
    })
}
