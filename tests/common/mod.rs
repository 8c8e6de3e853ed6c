//! Shared test factories that record how bootstrap invokes them.

use std::sync::{Arc, Mutex};

use micro_bootstrap::components::{
    Broker, ConsulRegistry, HttpBroker, HttpTransport, RandomSelector, Registry, Selector,
    Transport,
};
use micro_bootstrap::{options, Opt};

/// One factory invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Broker(Vec<String>),
    Registry(Vec<String>),
    /// Whether the selector factory was handed a registry.
    Selector(bool),
    Transport(Vec<String>),
}

/// Factory invocations in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    /// Options registering recording factories under `kind` for all four
    /// component kinds. The recorders build the built-in implementations.
    pub fn options(&self, kind: &str) -> Vec<Opt> {
        let (b, r, s, t) = (self.clone(), self.clone(), self.clone(), self.clone());
        vec![
            options::broker(kind, move |addrs| {
                b.push(Call::Broker(addrs.clone()));
                Arc::new(HttpBroker::new(addrs)) as Arc<dyn Broker>
            }),
            options::registry(kind, move |addrs| {
                r.push(Call::Registry(addrs.clone()));
                Arc::new(ConsulRegistry::new(addrs)) as Arc<dyn Registry>
            }),
            options::selector(kind, move |registry| {
                s.push(Call::Selector(registry.is_some()));
                Arc::new(RandomSelector::new(registry)) as Arc<dyn Selector>
            }),
            options::transport(kind, move |addrs| {
                t.push(Call::Transport(addrs.clone()));
                Arc::new(HttpTransport::new(addrs)) as Arc<dyn Transport>
            }),
        ]
    }
}

/// Program name plus `args`, logging kept on stderr.
pub fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("svc")
        .chain(std::iter::once("--logtostderr"))
        .chain(args.iter().copied())
        .map(str::to_owned)
        .collect()
}
