//! Where partition text comes from: HTTP or a local directory.

use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SourceConfig;
use crate::error::SourceError;

/// Fetch the raw TSV text of one partition.
pub trait PartitionFetcher {
    fn fetch(&self, key: &str) -> impl Future<Output = Result<String, SourceError>> + Send;
}

pub struct HttpFetcher {
    client: Client,
    config: SourceConfig,
}

impl HttpFetcher {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("OpeningDriller/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl PartitionFetcher for HttpFetcher {
    async fn fetch(&self, key: &str) -> Result<String, SourceError> {
        let url = self.config.partition_url(key);
        tracing::debug!(%url, "Fetching partition");

        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(SourceError::Http(format!("HTTP {} for {}", resp.status(), url)));
        }

        Ok(resp.text().await?)
    }
}

/// Reads `<dir>/<key>.tsv`.
pub struct DirFetcher {
    dir: PathBuf,
}

impl DirFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Partition keys present in the directory, from `*.tsv` file stems.
    pub fn discover_partitions(&self) -> Result<Vec<String>, SourceError> {
        let pattern = format!("{}/*.tsv", self.dir.display());
        let paths = glob::glob(&pattern).map_err(|_| SourceError::Config("invalid ECO_LOCAL_DIR"))?;

        let mut keys: Vec<String> = paths
            .filter_map(|p| p.ok())
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

impl PartitionFetcher for DirFetcher {
    async fn fetch(&self, key: &str) -> Result<String, SourceError> {
        let path = self.dir.join(format!("{key}.tsv"));
        Ok(tokio::fs::read_to_string(path).await?)
    }
}
