/// Object store signer
///
/// Wraps an S3-compatible store and mints time-limited signed GET URLs.
/// Signing is a local operation over the configured credentials; no network
/// round trip is made per URL.
use crate::{error::AppResult, services::providers::UrlSigner};
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use std::time::Duration;

#[derive(Clone)]
pub struct S3UrlSigner {
    store: AmazonS3,
}

impl S3UrlSigner {
    /// Build a signer for one bucket.
    ///
    /// `endpoint` switches to an S3-compatible provider (MinIO, Spaces, ...);
    /// plain-http endpoints are only expected in local development.
    pub fn new(
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key_id: String,
        secret_access_key: String,
    ) -> AppResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_region(region)
            .with_bucket_name(bucket)
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key);

        if let Some(endpoint) = endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder.build()?;
        Ok(Self { store })
    }
}

#[async_trait::async_trait]
impl UrlSigner for S3UrlSigner {
    async fn signed_get_url(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        let url = self
            .store
            .signed_url(Method::GET, &Path::from(key), expires_in)
            .await?;
        Ok(url.to_string())
    }
}
