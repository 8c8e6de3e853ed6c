//! Node selection on top of the service registry.

use std::fmt;
use std::sync::Arc;

use crate::components::registry::Registry;

/// A node selector as seen by the bootstrap layer.
pub trait Selector: Send + Sync + fmt::Debug {
    /// Kind identifier this selector was registered under.
    fn kind(&self) -> &str;

    /// Registry the selector reads nodes from, if it was given one.
    fn registry(&self) -> Option<&Arc<dyn Registry>>;
}

/// Constructor for a selector kind.
///
/// Receives the registry in effect after registry resolution, which may be
/// absent when no registry kind resolved and none was published before.
pub type SelectorFactory =
    Arc<dyn Fn(Option<Arc<dyn Registry>>) -> Arc<dyn Selector> + Send + Sync>;

/// Built-in `random` selector.
#[derive(Debug, Clone, Default)]
pub struct RandomSelector {
    registry: Option<Arc<dyn Registry>>,
}

impl RandomSelector {
    pub fn new(registry: Option<Arc<dyn Registry>>) -> Self {
        Self { registry }
    }

    /// Factory registered under `"random"` by default.
    pub fn factory() -> SelectorFactory {
        Arc::new(|registry| Arc::new(RandomSelector::new(registry)) as Arc<dyn Selector>)
    }
}

impl Selector for RandomSelector {
    fn kind(&self) -> &str {
        "random"
    }

    fn registry(&self) -> Option<&Arc<dyn Registry>> {
        self.registry.as_ref()
    }
}
