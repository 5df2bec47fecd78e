use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

use crate::types::{ProbeTarget, S3Credentials};

/// Region used when the request does not name one. S3-compatible services
/// generally accept any region string, and the AWS SDK refuses to sign
/// without one.
const DEFAULT_REGION: &str = "us-east-1";

const CREDENTIALS_PROVIDER_NAME: &str = "s3probe-request";

/// Build the request-scoped S3 client from the probe target.
///
/// Static credentials come from the request's basic auth; without them the
/// client is configured for unsigned (anonymous) access. A non-empty
/// `endpoint` switches the client to the S3-compatible service named by the
/// request, and `force_path_style` selects `endpoint/bucket/key` URLs as
/// required by MinIO and similar services.
pub async fn create_client(target: &ProbeTarget) -> Client {
    let region = target
        .region
        .clone()
        .filter(|region| !region.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

    loader = match &target.credentials {
        S3Credentials::Static(keys) => loader.credentials_provider(Credentials::new(
            keys.access_key.clone(),
            keys.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        )),
        S3Credentials::Anonymous => loader.no_credentials(),
    };

    let shared_config = loader.load().await;
    let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

    if let Some(ref endpoint) = target.endpoint {
        if !endpoint.is_empty() {
            builder = builder.endpoint_url(endpoint);
        }
    }

    if target.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
