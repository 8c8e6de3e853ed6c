//! End-to-end runs of the command lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use micro_bootstrap::components::{Broker, Component, HttpBroker};
use micro_bootstrap::{defaults, options, BootstrapError, Cmd, CmdError, Defaults};
use serial_test::serial;

mod common;

use common::{argv, Call, CallLog};

#[test]
#[serial]
fn resolves_flags_into_published_defaults() {
    defaults::clear();
    let log = CallLog::default();
    let mut cmd = Cmd::new(log.options("http"));

    let ctx = cmd
        .try_init_from(
            argv(&[
                "--broker=http",
                "--broker_address=10.0.0.1:4222,10.0.0.2:4222",
                "--registry=consul",
                "--selector=random",
                "--server_name=svc.example",
                "--server_metadata=version=1.0.0",
                "--server_metadata=env=prod",
            ]),
            Vec::new(),
        )
        .unwrap();

    let broker_calls: Vec<_> = log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Broker(_)))
        .collect();
    assert_eq!(
        broker_calls,
        vec![Call::Broker(vec!["10.0.0.1:4222".into(), "10.0.0.2:4222".into()])]
    );

    let expected: HashMap<String, String> = HashMap::from([
        ("version".to_string(), "1.0.0".to_string()),
        ("env".to_string(), "prod".to_string()),
    ]);
    assert_eq!(ctx.report().metadata, expected);

    let server = defaults::server().unwrap();
    assert_eq!(server.info().name, "svc.example");
    assert_eq!(server.info().metadata, expected);
    assert!(Arc::ptr_eq(ctx.defaults(), &defaults::current()));
    assert_eq!(
        defaults::broker().unwrap().addresses(),
        ["10.0.0.1:4222".to_string(), "10.0.0.2:4222".to_string()]
    );
}

#[test]
#[serial]
fn registry_flag_default_still_resolves() {
    defaults::clear();
    let mut cmd = Cmd::new(Vec::new());

    let ctx = cmd.try_init_from(argv(&[]), Vec::new()).unwrap();

    let outcome = ctx.report().outcome(Component::Registry).unwrap();
    assert_eq!(outcome.kind, "consul");
    assert!(outcome.resolved);
    assert_eq!(defaults::registry().unwrap().kind(), "consul");
    // one empty address from the unset registry_address flag
    assert_eq!(defaults::registry().unwrap().addresses(), [String::new()]);
}

#[test]
#[serial]
fn unknown_broker_kind_leaves_slot_untouched() {
    let previous: Arc<dyn Broker> = Arc::new(HttpBroker::new(vec!["previous".into()]));
    defaults::publish(Defaults {
        broker: Some(previous.clone()),
        ..Defaults::default()
    });

    let mut cmd = Cmd::new(Vec::new());
    let ctx = cmd.try_init_from(argv(&["--broker=kafka"]), Vec::new()).unwrap();

    assert!(Arc::ptr_eq(&defaults::broker().unwrap(), &previous));
    let unresolved: Vec<_> = ctx.report().unresolved().map(|o| (o.component, o.kind.as_str())).collect();
    assert!(unresolved.contains(&(Component::Broker, "kafka")));

    defaults::clear();
    let ctx = cmd.try_init_from(argv(&["--broker=kafka"]), Vec::new()).unwrap();
    assert!(ctx.defaults().broker.is_none());
}

#[test]
#[serial]
fn selector_always_follows_registry() {
    defaults::clear();
    let log = CallLog::default();
    let mut cmd = Cmd::new(log.options("rec"));

    let ctx = cmd
        .try_init_from(
            argv(&[
                "--transport=rec",
                "--selector=rec",
                "--registry=rec",
                "--broker=rec",
                "--registry_address=a,,b,",
            ]),
            Vec::new(),
        )
        .unwrap();

    assert_eq!(
        log.calls(),
        vec![
            Call::Broker(vec![String::new()]),
            Call::Registry(vec!["a".into(), String::new(), "b".into(), String::new()]),
            Call::Selector(true),
            Call::Transport(vec![String::new()]),
        ]
    );

    let defaults = ctx.defaults();
    let selector_registry = defaults.selector.as_ref().unwrap().registry().unwrap();
    assert!(Arc::ptr_eq(selector_registry, defaults.registry.as_ref().unwrap()));
}

#[test]
#[serial]
fn server_and_client_built_when_nothing_resolves() {
    defaults::clear();
    let mut cmd = Cmd::new(Vec::new());

    let ctx = cmd
        .try_init_from(
            argv(&["--broker=x", "--registry=x", "--selector=x", "--transport=x"]),
            Vec::new(),
        )
        .unwrap();

    assert_eq!(ctx.report().unresolved().count(), 4);
    assert!(defaults::server().is_some());
    let client = defaults::client().unwrap();
    assert!(client.options().selector.is_none());
    assert!(client.options().broker.is_none());
}

#[test]
#[serial]
fn strict_kinds_abort_before_action() {
    defaults::clear();
    let ran = Arc::new(Mutex::new(false));
    let flag = ran.clone();
    let mut cmd = Cmd::new(vec![options::strict_kinds()]).action(move |_| {
        *flag.lock().unwrap() = true;
        Ok(())
    });

    let err = cmd.try_init_from(argv(&["--selector=random", "--broker=kafka"]), Vec::new()).unwrap_err();

    match err {
        CmdError::Bootstrap(BootstrapError::UnknownKind { component, kind, .. }) => {
            assert_eq!(component, Component::Broker);
            assert_eq!(kind, "kafka");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!*ran.lock().unwrap());
    assert!(defaults::server().is_none(), "nothing is published on failure");
}

#[test]
#[serial]
fn action_sees_published_defaults_and_flags() {
    defaults::clear();
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let mut cmd = Cmd::new(Vec::new()).action(move |ctx| {
        let server = defaults::server().ok_or("server not published")?;
        *sink.lock().unwrap() = Some((
            server.info().name,
            ctx.string("broker"),
            ctx.bool("logtostderr"),
            ctx.strings("server_metadata"),
            ctx.string("not_a_flag"),
        ));
        Ok(())
    });

    cmd.try_init_from(argv(&["--server_name=greeter", "--server_metadata=k"]), Vec::new())
        .unwrap();

    assert_eq!(
        seen.lock().unwrap().clone(),
        Some((
            "greeter".to_string(),
            "http".to_string(),
            true,
            vec!["k".to_string()],
            String::new(),
        ))
    );
}

#[test]
#[serial]
fn action_failure_is_reported() {
    let mut cmd = Cmd::new(Vec::new()).action(|_| Err("boom".into()));
    let err = cmd.try_init_from(argv(&[]), Vec::new()).unwrap_err();
    assert!(matches!(err, CmdError::Action(ref msg) if msg == "boom"));
}

#[test]
#[serial]
fn help_and_version_surface_as_cli_errors() {
    let mut cmd = Cmd::new(vec![options::version("1.2.3")]);
    let err = cmd.try_init_from(["svc", "--help"], Vec::new()).unwrap_err();
    match err {
        CmdError::Cli(e) => {
            assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp);
            assert_eq!(e.exit_code(), 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = cmd.try_init_from(["svc", "--version"], Vec::new()).unwrap_err();
    assert!(matches!(err, CmdError::Cli(ref e) if e.kind() == clap::error::ErrorKind::DisplayVersion));

    let err = cmd.try_init_from(["svc", "--bogus"], Vec::new()).unwrap_err();
    assert!(matches!(err, CmdError::Cli(ref e) if e.exit_code() != 0));
}

#[test]
#[serial]
fn init_reapplies_options_before_parsing() {
    let mut cmd = Cmd::new(vec![options::name("before")]);
    assert_eq!(cmd.app().get_name(), "before");

    cmd.try_init_from(argv(&[]), vec![options::name("after"), options::version("2.0.0")])
        .unwrap();

    assert_eq!(cmd.options().name, "after");
    assert_eq!(cmd.app().get_name(), "after");
    assert_eq!(cmd.app().get_version(), Some("2.0.0"));
}

#[test]
#[serial]
fn environment_backs_unset_flags() {
    std::env::set_var("MICRO_BROKER", "kafka");
    std::env::set_var("MICRO_SERVER_NAME", "from-env");

    let mut cmd = Cmd::new(Vec::new());
    let env_only = cmd.try_init_from(argv(&[]), Vec::new());
    let flag_wins = cmd.try_init_from(argv(&["--server_name=from-flag"]), Vec::new());

    std::env::remove_var("MICRO_BROKER");
    std::env::remove_var("MICRO_SERVER_NAME");

    let ctx = env_only.unwrap();
    assert_eq!(ctx.flags().broker, "kafka");
    assert_eq!(ctx.flags().server_name, "from-env");
    assert!(!ctx.report().outcome(Component::Broker).unwrap().resolved);
    assert_eq!(flag_wins.unwrap().flags().server_name, "from-flag");
}

#[test]
#[serial]
fn metadata_from_environment_is_comma_separated() {
    std::env::set_var("MICRO_SERVER_METADATA", "version=1.0.0, env=prod");

    let mut cmd = Cmd::new(Vec::new());
    let from_env = cmd.try_init_from(argv(&[]), Vec::new());
    let from_flag = cmd.try_init_from(argv(&["--server_metadata=tags=a,b"]), Vec::new());

    std::env::remove_var("MICRO_SERVER_METADATA");

    let ctx = from_env.unwrap();
    assert_eq!(ctx.flags().server_metadata, vec!["version=1.0.0", "env=prod"]);
    assert_eq!(
        ctx.report().metadata,
        HashMap::from([
            ("version".to_string(), "1.0.0".to_string()),
            ("env".to_string(), "prod".to_string()),
        ])
    );
    let server = ctx.defaults().server.as_ref().unwrap();
    assert_eq!(server.info().metadata["env"], "prod");

    let ctx = from_flag.unwrap();
    assert_eq!(ctx.report().metadata["tags"], "a,b");
}
