//! The Flag Surface.
//!
//! Every flag is declared once here; `MICRO_*` environment variables back the
//! service flags. Logging flags have no environment alias and are forwarded to
//! the logging subsystem as a typed block.

use std::collections::HashMap;

use clap::parser::ValueSource;
use clap::{ArgMatches, Args, FromArgMatches};

/// Parsed service and logging flags.
#[derive(Debug, Clone, Args)]
pub struct Flags {
    /// Name of the server. go.micro.srv.example
    #[arg(long = "server_name", env = "MICRO_SERVER_NAME", default_value = "")]
    pub server_name: String,

    /// Version of the server. 1.1.0
    #[arg(long = "server_version", env = "MICRO_SERVER_VERSION", default_value = "")]
    pub server_version: String,

    /// Id of the server. Auto-generated if not specified
    #[arg(long = "server_id", env = "MICRO_SERVER_ID", default_value = "")]
    pub server_id: String,

    /// Bind address for the server. 127.0.0.1:8080
    #[arg(long = "server_address", env = "MICRO_SERVER_ADDRESS", default_value = ":0")]
    pub server_address: String,

    /// Used instead of the server_address when registering with discovery. 127.0.0.1:8080
    #[arg(long = "server_advertise", env = "MICRO_SERVER_ADVERTISE", default_value = "")]
    pub server_advertise: String,

    /// A list of key-value pairs defining metadata. version=1.0.0
    #[arg(long = "server_metadata", env = "MICRO_SERVER_METADATA", action = clap::ArgAction::Append)]
    pub server_metadata: Vec<String>,

    /// Broker for pub/sub. http, nats, rabbitmq
    #[arg(long = "broker", env = "MICRO_BROKER", default_value = "http")]
    pub broker: String,

    /// Comma-separated list of broker addresses
    #[arg(long = "broker_address", env = "MICRO_BROKER_ADDRESS", default_value = "")]
    pub broker_address: String,

    /// Registry for discovery. memory, consul, etcd, kubernetes
    #[arg(long = "registry", env = "MICRO_REGISTRY", default_value = "consul")]
    pub registry: String,

    /// Comma-separated list of registry addresses
    #[arg(long = "registry_address", env = "MICRO_REGISTRY_ADDRESS", default_value = "")]
    pub registry_address: String,

    /// Selector used to pick nodes for querying. random, roundrobin, blacklist
    #[arg(long = "selector", env = "MICRO_SELECTOR", default_value = "selector")]
    pub selector: String,

    /// Transport mechanism used; http, rabbitmq, nats
    #[arg(long = "transport", env = "MICRO_TRANSPORT", default_value = "http")]
    pub transport: String,

    /// Comma-separated list of transport addresses
    #[arg(long = "transport_address", env = "MICRO_TRANSPORT_ADDRESS", default_value = "")]
    pub transport_address: String,

    #[command(flatten)]
    pub log: LogFlags,
}

/// Logging flags forwarded verbatim to the logging subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct LogFlags {
    /// log to standard error instead of files
    #[arg(long = "logtostderr")]
    pub logtostderr: bool,

    /// log to standard error as well as files
    #[arg(long = "alsologtostderr")]
    pub alsologtostderr: bool,

    /// log files will be written to this directory instead of the default temporary directory
    #[arg(long = "log_dir", default_value = "")]
    pub log_dir: String,

    /// logs at or above this threshold go to stderr
    #[arg(long = "stderrthreshold", default_value = "")]
    pub stderrthreshold: String,

    /// log level for V logs
    #[arg(long = "v", default_value = "")]
    pub v: String,

    /// comma-separated list of pattern=N settings for file-filtered logging
    #[arg(long = "vmodule", default_value = "")]
    pub vmodule: String,

    /// when logging hits line file:N, emit a stack trace
    #[arg(long = "log_backtrace_at", default_value = "")]
    pub log_backtrace_at: String,
}

impl Flags {
    /// Declare the flag surface on `cmd`.
    pub fn declare(cmd: clap::Command) -> clap::Command {
        Self::augment_args(cmd)
    }

    /// Read the typed flag values back out of parsed matches.
    ///
    /// `server_metadata` taken from `MICRO_SERVER_METADATA` is a
    /// comma-separated list; command-line values are used as given.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut flags = Self::from_arg_matches(matches)?;
        if matches.value_source("server_metadata") == Some(ValueSource::EnvVariable) {
            flags.server_metadata = split_env_list(&flags.server_metadata);
        }
        Ok(flags)
    }

    /// Split `broker_address` into its address list.
    pub fn broker_addresses(&self) -> Vec<String> {
        split_addresses(&self.broker_address)
    }

    /// Split `registry_address` into its address list.
    pub fn registry_addresses(&self) -> Vec<String> {
        split_addresses(&self.registry_address)
    }

    /// Split `transport_address` into its address list.
    pub fn transport_addresses(&self) -> Vec<String> {
        split_addresses(&self.transport_address)
    }

    /// Assemble the metadata map from `server_metadata`.
    pub fn metadata(&self) -> HashMap<String, String> {
        parse_metadata(&self.server_metadata)
    }
}

/// Split a comma-separated address flag.
///
/// No trimming or filtering: `"a,,b,"` yields `["a", "", "b", ""]` and an
/// empty flag yields a single empty address.
pub fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_owned).collect()
}

/// Split environment-sourced list values on `,` and trim each token.
pub fn split_env_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_string())
        .collect()
}

/// Build a metadata map from `key=value` tokens.
///
/// The key ends at the first `=`; the value is everything after it. A token
/// without `=` maps to an empty value. Later duplicates win.
pub fn parse_metadata<I, S>(tokens: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| {
            let token = token.as_ref();
            match token.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (token.to_string(), String::new()),
            }
        })
        .collect()
}
