//! Service bootstrap library.
//!
//! Turns command-line flags and `MICRO_*` environment variables into the
//! process-wide broker, registry, selector, transport, server and client,
//! constructed in dependency order before the application's action runs.
//!
//! ```no_run
//! use micro_bootstrap::{options, Cmd};
//!
//! let mut cmd = Cmd::new([options::name("go.micro.srv.greeter"), options::version("1.0.0")])
//!     .action(|ctx| {
//!         let server = ctx.defaults().server.as_ref().expect("server is always built");
//!         println!("serving {}", server.info().name);
//!         Ok(())
//!     });
//! cmd.init(Vec::new());
//! ```

// Configuration and flags
pub mod config;

// Components and their process-wide slots
pub mod components;
pub mod defaults;

// Startup
pub mod cmd;
pub mod error;
pub mod lifecycle;
pub mod observability;

#[cfg(test)]
mod test_support;

pub use cmd::{init, Cmd, Context};
pub use config::options;
pub use config::{Flags, LogFlags, Opt, Options};
pub use defaults::Defaults;
pub use error::{BootstrapError, CmdError};
pub use lifecycle::{BootstrapReport, Bootstrapped, Resolution};
