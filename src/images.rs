//! Image Resolution
//!
//! Every image referenced by the label table is fetched up front and encoded
//! for template substitution. Fetches run concurrently; the dictionary is
//! assembled only after every fetch has completed, so a single failure fails
//! the whole resolution step.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::PipelineError;

/// Image name -> base64 payload, shared read-only across all renders.
pub type ImageDictionary = HashMap<String, String>;

/// One row of the image table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub link: String,
}

/// Read the image table in row order. No header rows.
pub fn read_image_entries(path: &Path) -> Result<Vec<ImageEntry>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut entries = Vec::new();
    for row in reader.deserialize::<ImageEntry>() {
        entries.push(row?);
    }
    Ok(entries)
}

/// Encode one fetched payload for substitution into a label template.
pub fn encode_entry(name: &str, bytes: &[u8]) -> (String, String) {
    let payload = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes);
    (name.to_string(), payload)
}

/// Merge encoded entries into a dictionary. Later entries override earlier
/// ones on duplicate names.
pub fn build_dictionary(encoded: Vec<(String, String)>) -> ImageDictionary {
    encoded.into_iter().collect()
}

/// Fetches image sources over HTTP.
pub struct ImageResolver {
    client: reqwest::Client,
}

impl ImageResolver {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch every entry concurrently and assemble the dictionary.
    ///
    /// Tasks fan out immediately; their handles are awaited in entry order,
    /// so duplicate names resolve to the later entry. No retries: the first
    /// fetch failure surfaces as the resolution result.
    pub async fn resolve(&self, entries: Vec<ImageEntry>) -> Result<ImageDictionary, PipelineError> {
        let tasks: Vec<_> = entries
            .into_iter()
            .map(|entry| {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let bytes = fetch_binary(&client, &entry.link)
                        .await
                        .map_err(|e| PipelineError::ImageFetch(entry.name.clone(), e))?;
                    debug!(name = %entry.name, bytes = bytes.len(), "image fetched");
                    Ok::<_, PipelineError>(encode_entry(&entry.name, &bytes))
                })
            })
            .collect();

        let mut encoded = Vec::with_capacity(tasks.len());
        for task in tasks {
            encoded.push(task.await??);
        }
        Ok(build_dictionary(encoded))
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

async fn fetch_binary(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
