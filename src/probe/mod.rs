pub mod aggregator;

use tracing::debug;

use crate::storage::ObjectStore;
use crate::types::error::ProbeError;
use crate::types::{ProbeTarget, S3Credentials};

use aggregator::Aggregator;

/// Query parameter names the probe endpoint accepts. Anything else rejects
/// the request before any network call.
const RECOGNIZED_PARAMETERS: &[&str] = &[
    "endpoint",
    "bucket",
    "prefix",
    "delimiter",
    "region",
    "forcePathStyle",
    "depth",
];

/// Validated probe request.
///
/// Built from the raw query pairs plus the request's basic auth; every
/// invariant on the parameters is enforced in [`ProbeQuery::from_pairs`] so
/// the orchestrator never sees an invalid combination.
#[derive(Debug, Clone)]
pub struct ProbeQuery {
    pub endpoint: String,
    pub bucket: String,
    pub prefix: String,
    pub delimiter: String,
    pub region: String,
    pub force_path_style: bool,
    pub depth: usize,
    pub credentials: S3Credentials,
}

impl ProbeQuery {
    /// Validate raw query pairs into a probe request.
    ///
    /// Rules:
    /// - every parameter name must be recognized;
    /// - `forcePathStyle` must parse as `true`/`false`, `depth` as a
    ///   non-negative integer (an empty value counts as absent, matching
    ///   form-style queries like `?forcePathStyle=`);
    /// - `delimiter` must be non-empty once `depth > 0`; splitting on an
    ///   empty separator is rejected rather than given ad-hoc semantics.
    pub fn from_pairs<I, K, V>(pairs: I, credentials: S3Credentials) -> Result<Self, ProbeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ProbeQuery {
            endpoint: String::new(),
            bucket: String::new(),
            prefix: String::new(),
            delimiter: String::new(),
            region: String::new(),
            force_path_style: false,
            depth: 0,
            credentials,
        };

        for (name, value) in pairs {
            let name = name.as_ref();
            let value = value.as_ref();

            if !RECOGNIZED_PARAMETERS.contains(&name) {
                return Err(ProbeError::UnknownParameter(name.to_string()));
            }

            match name {
                "endpoint" => query.endpoint = value.to_string(),
                "bucket" => query.bucket = value.to_string(),
                "prefix" => query.prefix = value.to_string(),
                "delimiter" => query.delimiter = value.to_string(),
                "region" => query.region = value.to_string(),
                "forcePathStyle" if !value.is_empty() => {
                    query.force_path_style = value
                        .parse::<bool>()
                        .map_err(|_| ProbeError::InvalidForcePathStyle(value.to_string()))?;
                }
                "depth" if !value.is_empty() => {
                    query.depth = value
                        .parse::<usize>()
                        .map_err(|_| ProbeError::InvalidDepth(value.to_string()))?;
                }
                _ => {}
            }
        }

        if query.depth > 0 && query.delimiter.is_empty() {
            return Err(ProbeError::EmptyDelimiterWithDepth);
        }

        Ok(query)
    }

    /// Connection parameters for the request-scoped storage client.
    pub fn target(&self) -> ProbeTarget {
        ProbeTarget {
            endpoint: (!self.endpoint.is_empty()).then(|| self.endpoint.clone()),
            region: (!self.region.is_empty()).then(|| self.region.clone()),
            force_path_style: self.force_path_style,
            credentials: self.credentials.clone(),
        }
    }
}

/// Run one probe to completion and render the exposition body.
///
/// Bucket resolution: an explicit `bucket` parameter is probed as-is (no
/// existence check; a bad name surfaces as a listing error from the
/// provider); otherwise all buckets visible to the credentials are probed,
/// and an empty enumeration fails distinctly with `NoBucketsFound`.
///
/// Buckets are processed one at a time, pages one at a time, every record
/// folded into a request-scoped aggregator. Any page failure aborts the
/// whole probe; partial results are never rendered.
pub async fn run_probe<S>(store: &S, query: &ProbeQuery) -> Result<String, ProbeError>
where
    S: ObjectStore + ?Sized,
{
    let buckets = if query.bucket.is_empty() {
        let buckets = store
            .list_buckets()
            .await
            .map_err(|source| ProbeError::BucketEnumeration { source })?;

        if buckets.is_empty() {
            return Err(ProbeError::NoBucketsFound);
        }
        buckets
    } else {
        vec![query.bucket.clone()]
    };

    let aggregator = Aggregator::new(&query.prefix, &query.delimiter, query.depth)
        .map_err(|e| ProbeError::Render { source: e.into() })?;

    for bucket in &buckets {
        let mut continuation_token: Option<String> = None;
        let mut pages = 0u64;
        let mut objects = 0u64;

        loop {
            let page = store
                .list_page(bucket, &query.prefix, continuation_token.take())
                .await
                .map_err(|source| ProbeError::Listing {
                    bucket: bucket.clone(),
                    prefix: query.prefix.clone(),
                    source,
                })?;

            pages += 1;
            objects += page.entries.len() as u64;

            for entry in &page.entries {
                aggregator.record(bucket, entry);
            }

            match page.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        debug!(
            bucket = bucket.as_str(),
            prefix = query.prefix.as_str(),
            pages = pages,
            objects = objects,
            "bucket listing completed."
        );
    }

    aggregator
        .render()
        .map_err(|e| ProbeError::Render { source: e.into() })
}
