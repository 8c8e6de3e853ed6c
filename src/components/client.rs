//! The service's outbound client.

use std::sync::Arc;

use crate::components::broker::Broker;
use crate::components::selector::Selector;
use crate::components::transport::Transport;

/// Components the client talks through.
///
/// Bootstrap fills these from the components in effect; applications never
/// configure them directly.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub broker: Option<Arc<dyn Broker>>,
    pub selector: Option<Arc<dyn Selector>>,
    pub transport: Option<Arc<dyn Transport>>,
}

/// The process's client.
#[derive(Debug, Clone, Default)]
pub struct Client {
    opts: ClientOptions,
}

impl Client {
    pub fn new(opts: ClientOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.opts
    }
}
