//! Process-wide defaults.
//!
//! One slot per component kind, published as a single immutable snapshot.
//! Bootstrap is the only writer; everything else reads through [`current`]
//! or the per-kind accessors.
//!
//! # Design Decisions
//! - Snapshot swap via `ArcSwapOption`, so readers never block
//! - Publishing replaces all slots at once; a slot the writer leaves as the
//!   prior value keeps that value

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::components::{Broker, Client, Registry, Selector, Server, Transport};

static DEFAULTS: ArcSwapOption<Defaults> = ArcSwapOption::const_empty();

/// The active instance of each component kind.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub broker: Option<Arc<dyn Broker>>,
    pub registry: Option<Arc<dyn Registry>>,
    pub selector: Option<Arc<dyn Selector>>,
    pub transport: Option<Arc<dyn Transport>>,
    pub server: Option<Arc<Server>>,
    pub client: Option<Arc<Client>>,
}

/// Current snapshot; empty when nothing has been published.
pub fn current() -> Arc<Defaults> {
    DEFAULTS.load_full().unwrap_or_default()
}

/// Replace the process-wide snapshot.
pub fn publish(defaults: Defaults) -> Arc<Defaults> {
    let defaults = Arc::new(defaults);
    DEFAULTS.store(Some(defaults.clone()));
    defaults
}

/// Drop every published default.
pub fn clear() {
    DEFAULTS.store(None);
}

pub fn broker() -> Option<Arc<dyn Broker>> {
    current().broker.clone()
}

pub fn registry() -> Option<Arc<dyn Registry>> {
    current().registry.clone()
}

pub fn selector() -> Option<Arc<dyn Selector>> {
    current().selector.clone()
}

pub fn transport() -> Option<Arc<dyn Transport>> {
    current().transport.clone()
}

pub fn server() -> Option<Arc<Server>> {
    current().server.clone()
}

pub fn client() -> Option<Arc<Client>> {
    current().client.clone()
}
