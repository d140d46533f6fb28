use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::bible::{BibleData, Translation};

pub const DEFAULT_API_BASE: &str = "https://3gxgwdn88j.execute-api.us-west-1.amazonaws.com/prod";

// The translation list is small; full translations run to several megabytes.
const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct TranslationsResponse {
    available: Vec<String>,
}

#[derive(Deserialize)]
struct BibleResponse {
    translation_name: String,
    data: serde_json::Value,
}

/// Client for the remote Bible API serving translation lists and full
/// translation texts as nested JSON.
pub struct BibleApiClient {
    client: Client,
    base_url: String,
}

impl BibleApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Names of the translations the API can serve.
    pub async fn fetch_translations(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/translations", self.base_url);
        log::info!("Fetching translation list from {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(LIST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Unable to reach the Bible API: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Bible API returned {} while listing translations",
                response.status()
            ));
        }

        let list: TranslationsResponse = response.json().await?;
        Ok(list.available)
    }

    /// Download one complete translation and build its data model.
    pub async fn fetch_translation(&self, name: &str) -> Result<Translation> {
        let id = name.to_lowercase();
        let url = format!("{}/api/{}", self.base_url, id);
        log::info!("Fetching translation '{}' from {}", id, url);

        let response = self
            .client
            .get(&url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Unable to reach the Bible API: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch translation '{}': HTTP {}",
                name,
                response.status()
            ));
        }

        let body: BibleResponse = response.json().await?;
        let data = BibleData::from_value(&body.data)
            .map_err(|e| anyhow!("Invalid Bible data received for '{}': {}", name, e))?;

        log::info!(
            "Loaded '{}': {} books, {} verses",
            body.translation_name,
            data.books().len(),
            data.verse_count()
        );

        Ok(Translation {
            id,
            name: body.translation_name,
            data,
        })
    }
}
