pub mod args;

/// Main configuration for the s3probe server process.
///
/// Holds everything the process needs at startup: the listen address,
/// optional TLS material, the shutdown grace period, the listing page size,
/// and logging settings. Per-request parameters (endpoint, bucket, prefix,
/// grouping) arrive with each probe request instead; the process itself is
/// stateless across requests.
///
/// # Quick Start
///
/// ```
/// use s3probe_rs::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.listen_address, "0.0.0.0:9340");
/// assert_eq!(config.max_keys, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub tls_cert_file: Option<String>,
    pub tls_key_file: Option<String>,
    pub shutdown_grace_period_seconds: u64,
    pub max_keys: i32,
    pub tracing_config: Option<TracingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: args::DEFAULT_LISTEN_ADDRESS.to_string(),
            tls_cert_file: None,
            tls_key_file: None,
            shutdown_grace_period_seconds: args::DEFAULT_SHUTDOWN_GRACE_PERIOD_SECONDS,
            max_keys: args::DEFAULT_MAX_KEYS,
            tracing_config: None,
        }
    }
}

impl Config {
    /// True when both TLS files are configured and the listener should
    /// speak HTTPS.
    pub fn tls_enabled(&self) -> bool {
        self.tls_cert_file.is_some() && self.tls_key_file.is_some()
    }
}

/// Tracing (logging) configuration supporting verbosity levels, JSON
/// format, color control, and AWS SDK tracing.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub span_events_tracing: bool,
    pub disable_color_tracing: bool,
}
