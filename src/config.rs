use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Identity service base URL (e.g. "https://xyz.supabase.co/auth/v1")
    pub identity_url: String,

    /// Identity service API key (sent alongside the caller's bearer token)
    pub identity_api_key: String,

    /// Catalog store base URL (e.g. "https://xyz.supabase.co/rest/v1")
    pub catalog_url: String,

    /// Catalog store API key
    pub catalog_api_key: String,

    /// Object storage region
    #[serde(default = "default_storage_region")]
    pub storage_region: String,

    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...)
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Bucket holding the media objects
    pub storage_bucket: String,

    pub storage_access_key_id: String,
    pub storage_secret_access_key: String,

    /// Validity window for issued signed URLs, in seconds
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,

    /// Per-call timeout for identity and catalog requests, in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_storage_region() -> String {
    "us-east-1".to_string()
}

fn default_signed_url_ttl_secs() -> u64 {
    600
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
