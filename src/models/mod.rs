use serde::{Deserialize, Serialize};

/// Authenticated identity resolved from a bearer token.
///
/// The issuer needs nothing beyond the user id; other claims stay with the
/// identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
}

/// One catalog row, read-only from the issuer's perspective.
///
/// `storage_key` may or may not be bucket-qualified; the catalog stores keys
/// inconsistently and the issuer tolerates both shapes (see
/// `services::playback::normalize_storage_key`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub content_id: String,
    pub storage_key: Option<String>,
}

/// A freshly minted, time-limited, read-only URL for one media object.
///
/// Never cached or reused across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_in: u64,
}
