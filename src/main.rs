//! Example service entry point.
//!
//! Bootstraps the process defaults from flags and prints the service
//! description a registry would publish.

use micro_bootstrap::{options, Cmd};

fn main() {
    let mut cmd = Cmd::new([
        options::name("go.micro.srv.example"),
        options::description("example service bootstrapped from flags"),
    ])
    .action(|ctx| {
        for outcome in ctx.report().unresolved() {
            tracing::warn!(component = %outcome.component, kind = %outcome.kind, "Running without this component");
        }

        if let Some(server) = &ctx.defaults().server {
            println!("{}", serde_json::to_string_pretty(&server.info())?);
        }
        Ok(())
    });

    cmd.init(Vec::new());
    tracing::info!("Shutdown complete");
}
