//! Raw dataset download
//!
//! Fetches the season statistics CSV from its configured URL, skipping the
//! download when the file is already on disk. Everything downstream works
//! off local files only.

use crate::Result;
use std::path::Path;

/// Downloads the raw season dataset
pub struct DatasetFetcher {
    client: reqwest::blocking::Client,
}

impl Default for DatasetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetFetcher {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("hoops/0.1")
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        DatasetFetcher { client }
    }

    /// Download the dataset to `dest` unless it is already present
    ///
    /// Returns true if a download happened, false on a cache hit.
    pub fn fetch(&self, url: &str, dest: &str) -> Result<bool> {
        if Path::new(dest).exists() {
            log::info!("Dataset already present at {}, skipping download", dest);
            return Ok(false);
        }

        log::info!("Downloading dataset from {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;

        if let Some(parent) = Path::new(dest).parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, &body)?;
        log::info!("Saved {} bytes to {}", body.len(), dest);
        Ok(true)
    }
}
