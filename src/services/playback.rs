use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::SignedUrl,
    services::providers::{CatalogProvider, IdentityProvider, UrlSigner},
};

/// Signed playback URL issuer
///
/// Turns "this caller, holding this credential, wants to play this content"
/// into either a short-lived read-only URL or a well-typed rejection. The
/// issuer is stateless: every call is an independent run through the step
/// sequence below, and nothing survives between calls.
///
/// Step order is mandatory (cheapest/most-authoritative first): token
/// presence, token verification, content id presence, catalog lookup, key
/// normalization, signing. On any failure no later step runs, so the signer
/// is never invoked for a request that cannot succeed.
pub struct PlaybackService {
    identity: Arc<dyn IdentityProvider>,
    catalog: Arc<dyn CatalogProvider>,
    signer: Arc<dyn UrlSigner>,
    bucket: String,
    validity: Duration,
}

impl PlaybackService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        catalog: Arc<dyn CatalogProvider>,
        signer: Arc<dyn UrlSigner>,
        bucket: String,
        validity: Duration,
    ) -> Self {
        Self {
            identity,
            catalog,
            signer,
            bucket,
            validity,
        }
    }

    /// Issue a signed playback URL for `content_id`.
    ///
    /// `bearer_token` is the credential extracted from the `Authorization`
    /// header; `None` when the header was absent or malformed.
    pub async fn issue_playback_url(
        &self,
        content_id: &str,
        bearer_token: Option<&str>,
    ) -> AppResult<SignedUrl> {
        let token = match bearer_token {
            Some(token) if !token.trim().is_empty() => token,
            _ => {
                return Err(AppError::Unauthenticated("Not authenticated".to_string()));
            }
        };

        let principal = self
            .identity
            .verify_token(token)
            .await?
            .ok_or_else(|| {
                AppError::Unauthenticated("User not found or not authenticated".to_string())
            })?;

        if content_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Missing film id".to_string()));
        }

        let storage_key = self
            .catalog
            .find_film(content_id)
            .await?
            .and_then(|entry| entry.storage_key)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::NotFound("Film not found or key missing".to_string())
            })?;

        let key = normalize_storage_key(&self.bucket, &storage_key);

        let url = self
            .signer
            .signed_get_url(key, self.validity)
            .await
            .map_err(|err| match err {
                // The HTTP contract pins this message regardless of which
                // layer inside the signer failed.
                AppError::Upstream { details, .. } => {
                    AppError::upstream("Could not generate signed url", details)
                }
                other => other,
            })?;

        tracing::info!(
            content_id = %content_id,
            user_id = %principal.id,
            validity_secs = self.validity.as_secs(),
            "Signed playback URL issued"
        );

        Ok(SignedUrl {
            url,
            expires_in: self.validity.as_secs(),
        })
    }
}

/// Strip a leading `"<bucket>/"` from a stored key, exactly once.
///
/// The catalog stores keys inconsistently: some are bucket-qualified
/// ("mybucket/movies/x.mp4"), some already bucket-relative ("movies/x.mp4").
/// The signer wants bucket-relative keys, so a matching prefix is removed —
/// once, never recursively, and only when followed by a path separator.
pub fn normalize_storage_key<'a>(bucket: &str, key: &'a str) -> &'a str {
    if bucket.is_empty() {
        return key;
    }
    key.strip_prefix(bucket)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(key)
}
