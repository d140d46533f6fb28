use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Arc;

use crate::bible::Translation;
use crate::client::BibleApiClient;

/// Preferred when no default translation is configured.
const FALLBACK_TRANSLATION: &str = "ESV";

/// Owns the API client and memoizes what it has fetched: each translation is
/// downloaded at most once per process, as is the available-translations
/// list. Loaded translations are handed out as `Arc` snapshots so the active
/// one can be swapped wholesale while readers keep their copy.
pub struct TranslationStore {
    client: BibleApiClient,
    translations: HashMap<String, Arc<Translation>>,
    available: Option<Vec<String>>,
}

impl TranslationStore {
    pub fn new(client: BibleApiClient) -> Self {
        Self {
            client,
            translations: HashMap::new(),
            available: None,
        }
    }

    pub async fn available_translations(&mut self) -> Result<Vec<String>> {
        if let Some(list) = &self.available {
            return Ok(list.clone());
        }

        let list = self.client.fetch_translations().await?;
        if list.is_empty() {
            return Err(anyhow!("The Bible API reports no available translations"));
        }
        self.available = Some(list.clone());
        Ok(list)
    }

    /// Fetch a translation, serving repeat requests from the in-memory cache.
    pub async fn get(&mut self, name: &str) -> Result<Arc<Translation>> {
        let id = name.to_lowercase();

        if let Some(translation) = self.translations.get(&id) {
            log::info!("Translation '{}' served from cache", id);
            return Ok(Arc::clone(translation));
        }

        let translation = Arc::new(self.client.fetch_translation(name).await?);
        self.translations.insert(id, Arc::clone(&translation));
        Ok(translation)
    }

    /// Load the startup translation: the configured preference if the API
    /// offers it, else ESV, else the first available.
    pub async fn default_translation(
        &mut self,
        preferred: Option<&str>,
    ) -> Result<Arc<Translation>> {
        let available = self.available_translations().await?;

        let pick = preferred
            .and_then(|p| {
                available
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(p))
                    .cloned()
            })
            .or_else(|| {
                available
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(FALLBACK_TRANSLATION))
                    .cloned()
            })
            .unwrap_or_else(|| available[0].clone());

        self.get(&pick).await
    }
}
