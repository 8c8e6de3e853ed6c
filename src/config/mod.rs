//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! option functions (Opt)
//!     → options.rs (Options: identity + kind → factory tables)
//!
//! argv + MICRO_* environment
//!     → flags.rs (clap declaration, typed Flags, raw ArgMatches)
//!     → lifecycle::startup (resolution)
//! ```
//!
//! # Design Decisions
//! - Options are fixed once `Cmd::init` has applied its extra options
//! - One parser owns every flag, logging flags included
//! - Unset string flags read as the empty string

pub mod flags;
pub mod options;

pub use flags::{Flags, LogFlags};
pub use options::{Opt, Options};
