/// External collaborator abstractions
///
/// The issuer talks to three upstreams: the identity service (token
/// verification), the catalog store (content id -> storage key), and the
/// object store signer (key -> time-limited URL). One trait per collaborator
/// so each can be swapped or mocked independently; concrete clients are
/// constructed once at startup and injected through `AppState`.
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{CatalogEntry, Principal},
};

pub mod catalog;
pub mod identity;
pub mod signer;

pub use catalog::RestCatalogProvider;
pub use identity::RestIdentityProvider;
pub use signer::S3UrlSigner;

/// Verifies bearer tokens against the hosted identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to a principal.
    ///
    /// `Ok(None)` means the credential was rejected or matches no user; the
    /// caller must re-authenticate. `Err` is reserved for transport or
    /// protocol failures — a network blip is not evidence the token is bad.
    async fn verify_token(&self, bearer_token: &str) -> AppResult<Option<Principal>>;
}

/// Looks up content ids in the hosted catalog store.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the catalog row for a content id, if one exists.
    ///
    /// The content id is passed through opaquely; its structure is the
    /// catalog's business.
    async fn find_film(&self, content_id: &str) -> AppResult<Option<CatalogEntry>>;
}

/// Issues time-limited signed GET URLs for objects in the media bucket.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UrlSigner: Send + Sync {
    /// Sign a read of `key` (bucket-relative) valid for `expires_in`.
    async fn signed_get_url(&self, key: &str, expires_in: Duration) -> AppResult<String>;
}
