//! Error types for command startup.

use crate::components::Component;

/// Failure of the bootstrap step. Any variant aborts startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// A requested kind has no registered factory (strict mode only).
    #[error("unknown {component} kind {kind:?}; registered: {registered:?}")]
    UnknownKind {
        component: Component,
        kind: String,
        registered: Vec<String>,
    },
}

/// Failure of `Cmd::try_init_from`.
#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    /// Flag parsing failed, or help/version was requested.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("action failed: {0}")]
    Action(String),
}
