use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/niklasf/eco/master";
pub const DEFAULT_PARTITIONS: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Base URL serving `<key>.tsv` partitions
    pub base_url: String,

    /// Partition keys, the first letter of the ECO code. Empty with
    /// `local_dir` set means every `*.tsv` in that directory.
    pub partitions: Vec<String>,

    /// Read `<dir>/<key>.tsv` instead of fetching over HTTP
    pub local_dir: Option<PathBuf>,

    pub http_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            partitions: DEFAULT_PARTITIONS.iter().map(|p| p.to_string()).collect(),
            local_dir: None,
            http_timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let local_dir = env::var("ECO_LOCAL_DIR").ok().map(PathBuf::from);
        let partitions = env::var("ECO_PARTITIONS")
            .ok()
            .map(|v| parse_partitions(&v))
            .filter(|keys| !keys.is_empty());

        Self {
            base_url: env::var("ECO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            partitions: resolve_partitions(partitions, local_dir.is_some()),
            local_dir,
            http_timeout_secs: env::var("ECO_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
        }
    }

    pub fn partition_url(&self, key: &str) -> String {
        format!("{}/{}.tsv", self.base_url, key)
    }
}

/// Explicit keys win; a local directory without them is discovered at load
/// time; otherwise the standard five partitions.
fn resolve_partitions(explicit: Option<Vec<String>>, has_local_dir: bool) -> Vec<String> {
    match explicit {
        Some(keys) => keys,
        None if has_local_dir => Vec::new(),
        None => DEFAULT_PARTITIONS.iter().map(|p| p.to_string()).collect(),
    }
}

/// Split a comma list like `"a, b,c"` into trimmed, non-empty keys.
fn parse_partitions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
