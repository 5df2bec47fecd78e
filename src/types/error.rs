use axum::http::StatusCode;
use thiserror::Error;

/// Request-boundary error taxonomy for the probe endpoint.
///
/// Every failure a probe request can hit maps to exactly one variant, and
/// every variant maps to one HTTP status via [`ProbeError::status_code`].
/// Nothing here is retried internally; the scraping system re-probes on its
/// own schedule.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// A query parameter name outside the recognized set.
    #[error("Invalid query parameter: {0}")]
    UnknownParameter(String),

    /// `forcePathStyle` was present but not a boolean.
    #[error("Invalid forcePathStyle parameter: {0}")]
    InvalidForcePathStyle(String),

    /// `depth` was present but not a non-negative integer.
    #[error("Invalid depth parameter: {0}")]
    InvalidDepth(String),

    /// Grouping by depth requires a delimiter to split on.
    #[error("Invalid delimiter parameter: delimiter must not be empty when depth > 0")]
    EmptyDelimiterWithDepth,

    /// The credentials see no buckets at all.
    #[error("No buckets found")]
    NoBucketsFound,

    /// Bucket enumeration failed at the provider.
    #[error("Error listing buckets: {source}")]
    BucketEnumeration { source: anyhow::Error },

    /// Object listing failed at the provider; aborts the whole probe.
    #[error("Error listing objects in s3://{bucket}/{prefix}: {source}")]
    Listing {
        bucket: String,
        prefix: String,
        source: anyhow::Error,
    },

    /// The per-request metric registry could not be built or encoded.
    #[error("Error rendering metrics: {source}")]
    Render { source: anyhow::Error },
}

impl ProbeError {
    /// HTTP status for this error.
    ///
    /// Validation failures are the client's fault (400), an empty bucket set
    /// is 404, and anything the provider refused is a server-side 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeError::UnknownParameter(_)
            | ProbeError::InvalidForcePathStyle(_)
            | ProbeError::InvalidDepth(_)
            | ProbeError::EmptyDelimiterWithDepth => StatusCode::BAD_REQUEST,
            ProbeError::NoBucketsFound => StatusCode::NOT_FOUND,
            ProbeError::BucketEnumeration { .. }
            | ProbeError::Listing { .. }
            | ProbeError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors raised before any network call is made.
    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}
