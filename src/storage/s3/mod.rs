pub mod client_builder;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use crate::storage::ObjectStore;
use crate::types::{ListingPage, ObjectEntry};

/// Extracts the S3 error code and message from an AWS SDK error.
///
/// For service errors (S3 API responses), returns the S3 error code
/// (e.g. "AccessDenied", "NoSuchBucket") and the human-readable error
/// message from the response. For other error types (network, timeout,
/// construction failure), returns "N/A" as the code and the full error
/// description as the message.
fn extract_sdk_error_details<E: std::fmt::Display + ProvideErrorMetadata>(
    e: &SdkError<E>,
) -> (String, String) {
    if let Some(service_err) = e.as_service_error() {
        (
            service_err.code().unwrap_or("unknown").to_string(),
            service_err.message().unwrap_or("no message").to_string(),
        )
    } else {
        ("N/A".to_string(), e.to_string())
    }
}

/// S3 implementation of the probe's listing capability.
///
/// One instance exists per probe request, wrapping the request-scoped
/// client built from the request's endpoint/region/credentials. Listing is
/// strictly sequential (one bucket at a time, one page at a time) and no
/// retries happen here beyond the SDK's own policy.
pub struct S3Store {
    client: Client,
    max_keys: i32,
}

impl S3Store {
    pub fn new(client: Client, max_keys: i32) -> Self {
        Self { client, max_keys }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self.client.list_buckets().send().await.map_err(|e| {
            let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
            tracing::error!(
                s3_error_code = s3_error_code,
                s3_error_message = s3_error_message,
                "S3 ListBuckets API call failed: {} ({}).",
                s3_error_code,
                s3_error_message,
            );
            anyhow::anyhow!(e).context("aws_sdk_s3::client::list_buckets() failed.")
        })?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(String::from))
            .collect())
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListingPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token)
            .max_keys(self.max_keys)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = bucket,
                    prefix = prefix,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 ListObjectsV2 API call failed for s3://{}/{}: {} ({}).",
                    bucket,
                    prefix,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow::anyhow!(e).context("aws_sdk_s3::client::list_objects_v2() failed.")
            })?;

        let entries = output
            .contents()
            .iter()
            .filter_map(|object| {
                object
                    .key()
                    .map(|key| ObjectEntry::new(key, object.size().unwrap_or(0)))
            })
            .collect();

        // The cursor is only valid while the provider flags truncation.
        let next_continuation_token = if output.is_truncated() == Some(true) {
            output.next_continuation_token().map(String::from)
        } else {
            None
        };

        Ok(ListingPage {
            entries,
            next_continuation_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_dummy_tracing_subscriber;
    use crate::types::{ProbeTarget, S3Credentials};

    async fn make_test_store() -> S3Store {
        let target = ProbeTarget {
            endpoint: Some("http://localhost:9000".to_string()),
            region: Some("us-east-1".to_string()),
            force_path_style: true,
            credentials: S3Credentials::Anonymous,
        };
        let client = client_builder::create_client(&target).await;
        S3Store::new(client, 1000)
    }

    #[tokio::test]
    async fn store_construction_keeps_max_keys() {
        init_dummy_tracing_subscriber();

        let store = make_test_store().await;
        assert_eq!(store.max_keys, 1000);
    }
}
