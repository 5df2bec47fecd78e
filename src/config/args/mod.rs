use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::ffi::OsString;

use crate::config::{Config, TracingConfig};
use self::value_parser::file_exist::is_file_exist;

pub mod value_parser;

// ---------------------------------------------------------------------------
// Default constants
// ---------------------------------------------------------------------------

pub(crate) const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:9340";
pub(crate) const DEFAULT_SHUTDOWN_GRACE_PERIOD_SECONDS: u64 = 5;
pub(crate) const DEFAULT_MAX_KEYS: i32 = 1000;
const DEFAULT_JSON_TRACING: bool = false;
const DEFAULT_AWS_SDK_TRACING: bool = false;
const DEFAULT_SPAN_EVENTS_TRACING: bool = false;
const DEFAULT_DISABLE_COLOR_TRACING: bool = false;

// ---------------------------------------------------------------------------
// Error messages
// ---------------------------------------------------------------------------

const ERROR_MESSAGE_TLS_PAIR: &str =
    "Both --tls-cert-file and --tls-key-file must be given to enable HTTPS.";
const ERROR_MESSAGE_MAX_KEYS_RANGE: &str = "Max keys must be between 1 and 1000 (S3 API limit).";
const ERROR_MESSAGE_LISTEN_ADDRESS: &str =
    "Listen address must be a socket address (e.g., 0.0.0.0:9340).";

// ---------------------------------------------------------------------------
// CLIArgs (clap-derived argument struct)
// ---------------------------------------------------------------------------

/// s3probe - On-demand Prometheus exporter for S3 bucket usage.
///
/// Serves GET /probe, which lists the objects of one or all buckets
/// reachable with the request's credentials and reports per-prefix object
/// count and cumulative size as gauges, and GET /metrics for the
/// exporter's own process metrics.
///
/// Example:
///   s3probe --listen-address 0.0.0.0:9340
///   s3probe --tls-cert-file tls/cert.pem --tls-key-file tls/key.pem -vv
#[derive(Parser, Clone, Debug)]
#[command(name = "s3probe", version, about, long_about = None)]
pub struct CLIArgs {
    // -----------------------------------------------------------------------
    // Server options
    // -----------------------------------------------------------------------
    /// Address to listen on.
    #[arg(long, env, default_value = DEFAULT_LISTEN_ADDRESS, help_heading = "Server")]
    pub listen_address: String,

    /// Path to the TLS certificate file (PEM). Requires --tls-key-file.
    #[arg(long, env, value_parser = is_file_exist, help_heading = "Server")]
    pub tls_cert_file: Option<String>,

    /// Path to the TLS private key file (PEM). Requires --tls-cert-file.
    #[arg(long, env, value_parser = is_file_exist, help_heading = "Server")]
    pub tls_key_file: Option<String>,

    /// Seconds in-flight requests may take to finish after the first
    /// termination signal; a second signal closes immediately.
    #[arg(long, env, default_value_t = DEFAULT_SHUTDOWN_GRACE_PERIOD_SECONDS, help_heading = "Server")]
    pub shutdown_grace_period_seconds: u64,

    // -----------------------------------------------------------------------
    // Logging options
    // -----------------------------------------------------------------------
    /// Verbosity level. -q (quiet), default (normal), -v, -vv, -vvv.
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Output logs in JSON format.
    #[arg(long, env, default_value_t = DEFAULT_JSON_TRACING, help_heading = "Logging")]
    pub json_tracing: bool,

    /// Enable AWS SDK tracing.
    #[arg(long, env, default_value_t = DEFAULT_AWS_SDK_TRACING, help_heading = "Logging")]
    pub aws_sdk_tracing: bool,

    /// Enable tracing span events.
    #[arg(long, env, default_value_t = DEFAULT_SPAN_EVENTS_TRACING, help_heading = "Logging")]
    pub span_events_tracing: bool,

    /// Disable colored output in logs.
    #[arg(long, env, default_value_t = DEFAULT_DISABLE_COLOR_TRACING, help_heading = "Logging")]
    pub disable_color_tracing: bool,

    // -----------------------------------------------------------------------
    // Advanced options
    // -----------------------------------------------------------------------
    /// Max keys per listing request (1-1000). Default: 1000.
    #[arg(long, env, default_value_t = DEFAULT_MAX_KEYS, help_heading = "Advanced")]
    pub max_keys: i32,
}

// ---------------------------------------------------------------------------
// parse_from_args (public API)
// ---------------------------------------------------------------------------

/// Parse command-line arguments into a `CLIArgs` struct.
///
/// # Example
///
/// ```
/// use s3probe_rs::config::args::parse_from_args;
///
/// let args = vec!["s3probe", "--listen-address", "127.0.0.1:9340"];
/// let cli_args = parse_from_args(args).unwrap();
/// assert_eq!(cli_args.listen_address, "127.0.0.1:9340");
/// ```
pub fn parse_from_args<I, T>(args: I) -> Result<CLIArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CLIArgs::try_parse_from(args)
}

/// Parse arguments and build a Config in one step.
///
/// Convenience function that combines `parse_from_args` and `Config::try_from`.
pub fn build_config_from_args<I, T>(args: I) -> Result<Config, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = CLIArgs::try_parse_from(args).map_err(|e| e.to_string())?;
    Config::try_from(cli_args)
}

// ---------------------------------------------------------------------------
// Validation and Config conversion
// ---------------------------------------------------------------------------

impl CLIArgs {
    fn validate(&self) -> Result<(), String> {
        if self.tls_cert_file.is_some() != self.tls_key_file.is_some() {
            return Err(ERROR_MESSAGE_TLS_PAIR.to_string());
        }
        if self.max_keys < 1 || self.max_keys > 1000 {
            return Err(ERROR_MESSAGE_MAX_KEYS_RANGE.to_string());
        }
        if self.listen_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ERROR_MESSAGE_LISTEN_ADDRESS.to_string());
        }
        Ok(())
    }

    fn build_tracing_config(&self) -> Option<TracingConfig> {
        self.verbosity.log_level().map(|level| TracingConfig {
            tracing_level: level,
            json_tracing: self.json_tracing,
            aws_sdk_tracing: self.aws_sdk_tracing,
            span_events_tracing: self.span_events_tracing,
            disable_color_tracing: self.disable_color_tracing,
        })
    }
}

impl TryFrom<CLIArgs> for Config {
    type Error = String;

    fn try_from(args: CLIArgs) -> Result<Self, Self::Error> {
        args.validate()?;

        let tracing_config = args.build_tracing_config();

        Ok(Config {
            listen_address: args.listen_address,
            tls_cert_file: args.tls_cert_file,
            tls_key_file: args.tls_key_file,
            shutdown_grace_period_seconds: args.shutdown_grace_period_seconds,
            max_keys: args.max_keys,
            tracing_config,
        })
    }
}
