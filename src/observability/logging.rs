//! Structured logging driven by the pass-through logging flags.
//!
//! # Responsibilities
//! - Translate `logtostderr`, `alsologtostderr`, `log_dir`,
//!   `stderrthreshold`, `v`, `vmodule` and `log_backtrace_at` into a
//!   [`LogConfig`]
//! - Install the `tracing` subscriber once per process
//!
//! # Design Decisions
//! - Values that do not parse are ignored and reported after installation
//! - `RUST_LOG` still applies; `v` only sets the default level
//! - An already-installed subscriber is left in place

use std::backtrace::Backtrace;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter, Layer};

use crate::config::LogFlags;

/// Severity names accepted by `stderrthreshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn level(self) -> Level {
        match self {
            Severity::Info => Level::INFO,
            Severity::Warning => Level::WARN,
            Severity::Error | Severity::Fatal => Level::ERROR,
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" | "0" => Ok(Severity::Info),
            "WARNING" | "1" => Ok(Severity::Warning),
            "ERROR" | "2" => Ok(Severity::Error),
            "FATAL" | "3" => Ok(Severity::Fatal),
            other => Err(format!("unknown severity {other:?}")),
        }
    }
}

/// Source location that triggers a backtrace dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktraceAt {
    pub file: String,
    pub line: u32,
}

impl FromStr for BacktraceAt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (file, line) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected file:N, got {s:?}"))?;
        let line = line
            .parse()
            .map_err(|_| format!("invalid line number in {s:?}"))?;
        if file.is_empty() {
            return Err(format!("missing file name in {s:?}"));
        }
        Ok(Self {
            file: file.to_string(),
            line,
        })
    }
}

/// A flag value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredValue {
    pub flag: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for IgnoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}={:?}: {}", self.flag, self.value, self.reason)
    }
}

/// Logging settings derived from the logging flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub to_stderr: bool,
    pub also_to_stderr: bool,
    pub log_dir: Option<PathBuf>,
    pub stderr_threshold: Severity,
    pub verbosity: Level,
    pub module_levels: Vec<(String, Level)>,
    pub backtrace_at: Option<BacktraceAt>,
    pub ignored: Vec<IgnoredValue>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            to_stderr: false,
            also_to_stderr: false,
            log_dir: None,
            stderr_threshold: Severity::Error,
            verbosity: Level::INFO,
            module_levels: Vec::new(),
            backtrace_at: None,
            ignored: Vec::new(),
        }
    }
}

/// Map a V level onto a tracing level.
fn verbosity_level(raw: &str) -> Result<Level, String> {
    let v: i32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected an integer, got {raw:?}"))?;
    Ok(match v {
        i32::MIN..=0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    })
}

impl LogConfig {
    pub fn from_flags(flags: &LogFlags) -> Self {
        let mut config = Self {
            to_stderr: flags.logtostderr,
            also_to_stderr: flags.alsologtostderr,
            log_dir: (!flags.log_dir.is_empty()).then(|| PathBuf::from(&flags.log_dir)),
            ..Self::default()
        };

        if !flags.stderrthreshold.is_empty() {
            match flags.stderrthreshold.parse() {
                Ok(severity) => config.stderr_threshold = severity,
                Err(reason) => config.ignore("stderrthreshold", &flags.stderrthreshold, reason),
            }
        }

        if !flags.v.is_empty() {
            match verbosity_level(&flags.v) {
                Ok(level) => config.verbosity = level,
                Err(reason) => config.ignore("v", &flags.v, reason),
            }
        }

        for entry in flags.vmodule.split(',').filter(|e| !e.is_empty()) {
            let parsed = entry
                .split_once('=')
                .ok_or_else(|| "expected pattern=N".to_string())
                .and_then(|(pattern, v)| {
                    let pattern = pattern.replace('*', "");
                    if pattern.is_empty() {
                        return Err("empty pattern".to_string());
                    }
                    Ok((pattern, verbosity_level(v)?))
                });
            match parsed {
                Ok(module) => config.module_levels.push(module),
                Err(reason) => config.ignore("vmodule", entry, reason),
            }
        }

        if !flags.log_backtrace_at.is_empty() {
            match flags.log_backtrace_at.parse() {
                Ok(at) => config.backtrace_at = Some(at),
                Err(reason) => config.ignore("log_backtrace_at", &flags.log_backtrace_at, reason),
            }
        }

        config
    }

    fn ignore(&mut self, flag: &'static str, value: &str, reason: String) {
        self.ignored.push(IgnoredValue {
            flag,
            value: value.to_string(),
            reason,
        });
    }

    /// Level filter for the stderr layer.
    pub fn stderr_filter(&self) -> LevelFilter {
        if self.to_stderr || self.also_to_stderr {
            LevelFilter::TRACE
        } else {
            LevelFilter::from_level(self.stderr_threshold.level())
        }
    }

    /// Path of the log file, or `None` when logging only to stderr.
    pub fn log_file(&self, program: &str) -> Option<PathBuf> {
        if self.to_stderr {
            return None;
        }
        let dir = self.log_dir.clone().unwrap_or_else(std::env::temp_dir);
        Some(dir.join(format!("{program}.log")))
    }

    /// Global filter: `RUST_LOG` if set, the V level by default, then one
    /// directive per `vmodule` entry.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.verbosity).into())
            .from_env_lossy();
        for (pattern, level) in &self.module_levels {
            match format!("{pattern}={}", level.as_str().to_ascii_lowercase()).parse::<Directive>() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => tracing::warn!(pattern = %pattern, error = %e, "Ignoring vmodule entry"),
            }
        }
        filter
    }

    /// Install the process subscriber.
    ///
    /// Returns `false` when a subscriber was already installed; the existing
    /// one is kept.
    pub fn install(&self, program: &str) -> bool {
        let mut ignored = self.ignored.clone();

        let file_layer = self.log_file(program).and_then(|path| {
            let opened = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
            match opened {
                Ok(file) => Some(
                    fmt_layer::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                ),
                Err(e) => {
                    ignored.push(IgnoredValue {
                        flag: "log_dir",
                        value: path.display().to_string(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        });
        let to_stderr_only = file_layer.is_none();

        let stderr_filter = if to_stderr_only {
            LevelFilter::TRACE
        } else {
            self.stderr_filter()
        };
        let stderr_layer = fmt_layer::layer()
            .with_writer(std::io::stderr)
            .with_filter(stderr_filter);

        let installed = tracing_subscriber::registry()
            .with(self.env_filter())
            .with(file_layer)
            .with(stderr_layer)
            .with(self.backtrace_at.clone().map(BacktraceLayer))
            .try_init()
            .is_ok();

        for value in &ignored {
            tracing::warn!(ignored = %value, "Ignoring logging flag value");
        }
        if !installed {
            tracing::debug!("Logging subscriber already installed; keeping it");
        }
        installed
    }
}

/// Dumps a backtrace to stderr when an event fires at the configured line.
struct BacktraceLayer(BacktraceAt);

impl BacktraceLayer {
    fn matches(&self, file: Option<&str>, line: Option<u32>) -> bool {
        line == Some(self.0.line) && file.is_some_and(|f| f.ends_with(self.0.file.as_str()))
    }
}

impl<S: Subscriber> Layer<S> for BacktraceLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if self.matches(meta.file(), meta.line()) {
            let backtrace = Backtrace::force_capture();
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "backtrace at {}:{}\n{backtrace}", self.0.file, self.0.line);
        }
    }
}
