//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! logging flags (parsed with every other flag)
//!     → logging.rs (LogConfig)
//!     → tracing subscriber: env filter, log file, stderr, backtrace hook
//! ```
//!
//! # Design Decisions
//! - Logging flags never reach a second parser; no argv rewriting
//! - Structured events through `tracing` everywhere

pub mod logging;

pub use logging::LogConfig;
