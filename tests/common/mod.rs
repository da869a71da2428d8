#![allow(dead_code)]

use eco_loader::error::SourceError;
use eco_loader::fetch::PartitionFetcher;
use opening_core::moves::{parse_line, Opening};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn opening(name: &str, line: &str) -> Opening {
    Opening::new(name, parse_line(line).unwrap())
}

/// In-memory partitions keyed by partition letter; missing keys fail like a 404.
pub struct MapFetcher {
    partitions: HashMap<String, String>,
}

impl MapFetcher {
    pub fn new(partitions: &[(&str, &str)]) -> Self {
        Self {
            partitions: partitions
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl PartitionFetcher for MapFetcher {
    async fn fetch(&self, key: &str) -> Result<String, SourceError> {
        self.partitions
            .get(key)
            .cloned()
            .ok_or_else(|| SourceError::Http(format!("HTTP 404 Not Found for {key}.tsv")))
    }
}

pub fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Unique suffix from the clock, for scratch directories.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}
