use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ListingPage, ProbeTarget};

pub mod s3;

/// Type alias for a boxed ObjectStore trait object.
pub type Store = Box<dyn ObjectStore + Send + Sync>;

/// Listing capability of the storage provider, injected into the probe
/// orchestrator so probes can run against a fake store in tests.
///
/// One implementation exists per probe request; the store owns the
/// request-scoped client and is dropped with the request.
#[async_trait]
pub trait ObjectStore {
    /// Enumerate the bucket names visible to the request's credentials.
    ///
    /// Failures are treated as unrecoverable; an empty result is legal here
    /// and handled by the orchestrator.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Fetch one page of object metadata for `bucket` under `prefix`.
    ///
    /// `continuation_token` is `None` for the first page and the previous
    /// page's cursor afterwards. The returned page carries the next cursor
    /// only while the provider reports more results.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListingPage>;
}

/// Factory for per-request stores.
///
/// The HTTP layer holds one factory for the lifetime of the process and asks
/// it for a fresh store per probe; tests swap in a factory returning mocks.
#[async_trait]
pub trait StoreFactory {
    async fn create(&self, target: &ProbeTarget) -> Result<Store>;
}

/// Production factory building [`s3::S3Store`] instances.
pub struct S3StoreFactory {
    max_keys: i32,
}

impl S3StoreFactory {
    /// `max_keys` caps the page size of every listing call made by the
    /// stores this factory creates.
    pub fn new(max_keys: i32) -> Self {
        Self { max_keys }
    }
}

#[async_trait]
impl StoreFactory for S3StoreFactory {
    async fn create(&self, target: &ProbeTarget) -> Result<Store> {
        let client = s3::client_builder::create_client(target).await;
        Ok(Box::new(s3::S3Store::new(client, self.max_keys)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_dummy_tracing_subscriber;
    use crate::types::S3Credentials;

    #[tokio::test]
    async fn s3_factory_creates_store() {
        init_dummy_tracing_subscriber();

        let target = ProbeTarget {
            endpoint: Some("http://localhost:9000".to_string()),
            region: Some("us-east-1".to_string()),
            force_path_style: true,
            credentials: S3Credentials::Anonymous,
        };

        let factory = S3StoreFactory::new(1000);
        assert!(factory.create(&target).await.is_ok());
    }
}
