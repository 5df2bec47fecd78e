use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, trace};

use s3probe_rs::config::Config;
use s3probe_rs::storage::S3StoreFactory;
use s3probe_rs::{CLIArgs, create_shutdown_token, server};

mod signal_handler;
mod tracing_init;

/// s3probe - On-demand Prometheus exporter for S3 bucket usage.
///
/// This binary is a thin wrapper over the s3probe-rs library.
/// All core functionality is implemented in the library crate.
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config_exit_if_err();

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    run(config).await
}

fn load_config_exit_if_err() -> Config {
    match Config::try_from(CLIArgs::parse()) {
        Ok(config) => config,
        Err(error_message) => {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit()
        }
    }
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    match config.tracing_config {
        Some(ref tracing_config) => {
            tracing_init::init_tracing(tracing_config);
            true
        }
        None => false,
    }
}

async fn run(config: Config) -> Result<()> {
    let handle = axum_server::Handle::new();
    let shutdown_token = create_shutdown_token();

    let signal_join_handle = signal_handler::spawn_signal_handler(
        handle.clone(),
        shutdown_token.clone(),
        Duration::from_secs(config.shutdown_grace_period_seconds),
    );

    let factory = Arc::new(S3StoreFactory::new(config.max_keys));
    let serve_result = server::serve(&config, factory, handle).await;

    // The listener is gone; release the signal watcher if it is still parked.
    shutdown_token.cancel();
    signal_join_handle.await?;

    debug!("s3probe has stopped.");
    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_fork::rusty_fork_test;
    use s3probe_rs::config::args::parse_from_args;

    rusty_fork_test! {
        #[test]
        fn with_tracing() {
            let args = vec!["s3probe", "-v"];

            let config = Config::try_from(parse_from_args(args).unwrap()).unwrap();
            assert!(start_tracing_if_necessary(&config));
        }

        #[test]
        fn without_tracing() {
            let args = vec!["s3probe", "-qq"];

            let config = Config::try_from(parse_from_args(args).unwrap()).unwrap();
            assert!(!start_tracing_if_necessary(&config));
        }
    }
}
