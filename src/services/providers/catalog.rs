/// Hosted catalog store client
///
/// Row lookups go through the backend's REST interface: a filtered select on
/// the films table, returning a JSON array of matching rows. The issuer only
/// ever needs the storage key column.
use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ApiFilmRow {
    id: String,
    #[serde(default)]
    storage_key: Option<String>,
}

#[derive(Clone)]
pub struct RestCatalogProvider {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl RestCatalogProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RestCatalogProvider {
    async fn find_film(&self, content_id: &str) -> AppResult<Option<CatalogEntry>> {
        let url = format!("{}/films", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("id", format!("eq.{}", content_id).as_str()),
                ("select", "id,storage_key"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(
                "Catalog store error",
                format!("status {}: {}", status, body),
            ));
        }

        let rows: Vec<ApiFilmRow> = response.json().await?;
        let entry = rows.into_iter().next().map(|row| CatalogEntry {
            content_id: row.id,
            storage_key: row.storage_key,
        });

        tracing::debug!(
            content_id = %content_id,
            found = entry.is_some(),
            provider = "catalog",
            "Catalog lookup completed"
        );

        Ok(entry)
    }
}
