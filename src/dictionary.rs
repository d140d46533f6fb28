use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_API_BASE: &str =
    "https://56eum3mj68.execute-api.us-west-1.amazonaws.com/prod";

const DEFINE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pronunciation {
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub wordnet: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub pronunciation: Pronunciation,
    #[serde(default)]
    pub definitions: Definitions,
}

/// Strip punctuation and lowercase before hitting the API, so a tapped word
/// like "beginning," or "God's" resolves.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase()
}

/// Client for the word-definition API.
pub struct DictionaryClient {
    client: Client,
    base_url: String,
}

impl DictionaryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn define(&self, word: &str) -> Result<DictionaryEntry> {
        let cleaned = clean_word(word);
        if cleaned.is_empty() {
            return Err(anyhow!("'{}' contains no letters to look up", word));
        }

        let url = format!("{}/api/define/{}", self.base_url, cleaned);
        log::info!("Looking up definition for '{}'", cleaned);

        let response = self
            .client
            .get(&url)
            .timeout(DEFINE_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Unable to reach the dictionary API: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("No definition found for '{}'", cleaned));
        }

        let entry: DictionaryEntry = response.json().await?;
        Ok(entry)
    }
}
