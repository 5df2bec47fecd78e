//! Shared test utilities for the s3probe library crate.
//!
//! This module provides canonical helper functions used across multiple test
//! modules, eliminating duplication and ensuring consistency.

use crate::probe::ProbeQuery;
use crate::types::S3Credentials;

/// Initialise a dummy tracing subscriber for tests.
///
/// Uses `try_init` so that only the first call in a process actually
/// installs the subscriber; subsequent calls are silently ignored.
pub(crate) fn init_dummy_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dummy=trace")
        .try_init();
}

/// Create an anonymous [`ProbeQuery`] with the given grouping parameters.
///
/// The endpoint/region fields stay empty; unit tests never reach a real
/// provider, so only the grouping-relevant fields matter.
pub(crate) fn make_anonymous_query(
    bucket: &str,
    prefix: &str,
    delimiter: &str,
    depth: usize,
) -> ProbeQuery {
    ProbeQuery {
        endpoint: String::new(),
        bucket: bucket.to_string(),
        prefix: prefix.to_string(),
        delimiter: delimiter.to_string(),
        region: String::new(),
        force_path_style: false,
        depth,
        credentials: S3Credentials::Anonymous,
    }
}
