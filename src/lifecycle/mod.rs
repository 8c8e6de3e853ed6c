//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Cmd::init:
//!     Apply options → Parse flags → startup::bootstrap → Action
//!
//! startup::bootstrap:
//!     Logging → Broker → Registry → Selector → Transport → Server → Client
//!     → defaults::publish
//! ```
//!
//! # Design Decisions
//! - Ordered startup: the selector needs the resolved registry
//! - Fail fast: any bootstrap error aborts before the action runs
//! - Runs once per process; nothing here is retried

pub mod startup;

pub use startup::{bootstrap, resolve, BootstrapReport, Bootstrapped, KindOutcome, Resolution};
