//! The command shell: options, the clap application, and the run lifecycle.
//!
//! # States
//! ```text
//! Cmd::new  → Built
//! Cmd::init → apply options → parse → bootstrap → action
//!           ├─ help / version     → exit(0)
//!           ├─ parse failure      → clap's error exit
//!           ├─ bootstrap failure  → exit(1)
//!           └─ otherwise          → action runs, Context returned
//! ```

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use clap::ArgMatches;

use crate::config::{Flags, Opt, Options};
use crate::defaults::Defaults;
use crate::error::CmdError;
use crate::lifecycle::{self, BootstrapReport};

/// Error type actions may return.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// The application's main action.
pub type Action = Box<dyn FnMut(&Context) -> Result<(), ActionError>>;

/// Name used for the clap application until options provide one.
const FALLBACK_APP_NAME: &str = "micro";

/// Everything known after a successful bootstrap.
#[derive(Debug, Clone)]
pub struct Context {
    flags: Flags,
    matches: ArgMatches,
    defaults: Arc<Defaults>,
    report: BootstrapReport,
}

impl Context {
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Raw parse result, for flags added to the app by the caller.
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// String value of flag `name`; empty when unset or not a string flag.
    pub fn string(&self, name: &str) -> String {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_default()
    }

    /// Boolean value of flag `name`; false when unset or not a boolean flag.
    pub fn bool(&self, name: &str) -> bool {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// All values of a repeatable flag `name`.
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.matches
            .try_get_many::<String>(name)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    /// Defaults published by this run.
    pub fn defaults(&self) -> &Arc<Defaults> {
        &self.defaults
    }

    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }
}

/// A command couples [`Options`] with the clap application that parses the
/// flag surface.
pub struct Cmd {
    opts: Options,
    app: clap::Command,
    action: Action,
}

impl Cmd {
    pub fn new(opts: impl IntoIterator<Item = Opt>) -> Self {
        let opts = Options::new(opts);
        let app = Flags::declare(clap::Command::new(FALLBACK_APP_NAME));
        let mut cmd = Self {
            opts,
            app,
            action: Box::new(|_| Ok(())),
        };
        cmd.sync_app();
        cmd
    }

    pub fn app(&self) -> &clap::Command {
        &self.app
    }

    /// Mutable access for adding application-specific flags.
    pub fn app_mut(&mut self) -> &mut clap::Command {
        &mut self.app
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Replace the default no-op action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.action = Box::new(action);
        self
    }

    /// Apply `opts`, parse the process arguments, bootstrap and run the
    /// action. Exits the process on any failure and after help/version.
    pub fn init(&mut self, opts: impl IntoIterator<Item = Opt>) -> Context {
        match self.try_init_from(std::env::args_os(), opts) {
            Ok(ctx) => ctx,
            Err(CmdError::Cli(e)) => e.exit(),
            Err(e) => {
                tracing::error!(error = %e, "Startup failed");
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    /// Like [`Cmd::init`] but with explicit arguments (program name first)
    /// and errors returned instead of exiting.
    pub fn try_init_from<I, T>(
        &mut self,
        args: I,
        opts: impl IntoIterator<Item = Opt>,
    ) -> Result<Context, CmdError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.opts.apply(opts);
        self.sync_app();

        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let program = program_name(args.first(), &self.opts);

        let matches = self.app.try_get_matches_from_mut(args)?;
        let flags = Flags::from_matches(&matches)?;
        let bootstrapped = lifecycle::bootstrap(&self.opts, &flags, &program)?;

        let ctx = Context {
            flags,
            matches,
            defaults: bootstrapped.defaults,
            report: bootstrapped.report,
        };
        (self.action)(&ctx).map_err(|e| CmdError::Action(e.to_string()))?;
        Ok(ctx)
    }

    /// Copy name, version and description onto the clap application.
    fn sync_app(&mut self) {
        let mut app = std::mem::take(&mut self.app).about(self.opts.description.clone());
        if !self.opts.name.is_empty() {
            app = app.name(self.opts.name.clone());
        }
        app = if self.opts.version.is_empty() {
            app.version(None::<&'static str>).disable_version_flag(true)
        } else {
            app.version(self.opts.version.clone()).disable_version_flag(false)
        };
        self.app = app;
    }
}

impl std::fmt::Debug for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cmd")
            .field("opts", &self.opts)
            .field("app", &self.app.get_name())
            .finish_non_exhaustive()
    }
}

/// Log file stem: the executable's file stem, else the service name.
fn program_name(arg0: Option<&OsString>, opts: &Options) -> String {
    arg0.and_then(|a| Path::new(a).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| {
            if opts.name.is_empty() {
                FALLBACK_APP_NAME.to_string()
            } else {
                opts.name.clone()
            }
        })
}

/// Build a command with default options and run [`Cmd::init`] on it.
pub fn init(opts: impl IntoIterator<Item = Opt>) -> Context {
    Cmd::new(Vec::new()).init(opts)
}
