//! Loads every partition concurrently, merges and sorts the openings, and
//! builds the tree.
//!
//! A partition that fails to fetch or lacks required columns doesn't abort
//! the load: its error is kept in the report and the rest are merged.

use futures::future::join_all;
use opening_core::moves::{sort_openings, Opening};
use opening_core::opening_tree::{build_opening_tree_with, CollisionPolicy, OpeningTree};
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::fetch::{DirFetcher, HttpFetcher, PartitionFetcher};
use crate::tsv::parse_partition;

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Sorted by line length, then name
    pub openings: Vec<Opening>,
    pub failures: Vec<(String, SourceError)>,
    pub skipped_rows: usize,
}

impl LoadReport {
    pub fn failed_partitions(&self) -> usize {
        self.failures.len()
    }
}

/// Fetch and parse `partitions`, merging whatever succeeds.
pub async fn load_openings<F: PartitionFetcher>(fetcher: &F, partitions: &[String]) -> LoadReport {
    let results = join_all(partitions.iter().map(|key| async move {
        let parsed = match fetcher.fetch(key).await {
            Ok(text) => parse_partition(key, &text),
            Err(e) => Err(e),
        };
        (key, parsed)
    }))
    .await;

    let mut report = LoadReport::default();
    for (key, parsed) in results {
        match parsed {
            Ok(parsed) => {
                report.skipped_rows += parsed.skipped();
                report.openings.extend(parsed.openings);
            }
            Err(e) => {
                warn!(partition = %key, "Failed to load partition: {e}");
                report.failures.push((key.clone(), e));
            }
        }
    }

    sort_openings(&mut report.openings);

    info!(
        openings = report.openings.len(),
        skipped_rows = report.skipped_rows,
        failed_partitions = report.failed_partitions(),
        "Loaded openings"
    );
    report
}

/// Load from the configured source (local directory if set, else HTTP) and
/// build the tree. A local directory with no partitions configured loads
/// every `*.tsv` it holds.
pub async fn load_tree(
    config: &SourceConfig,
    policy: CollisionPolicy,
) -> Result<(OpeningTree, LoadReport), SourceError> {
    let report = match &config.local_dir {
        Some(dir) => {
            let fetcher = DirFetcher::new(dir);
            let partitions = if config.partitions.is_empty() {
                fetcher.discover_partitions()?
            } else {
                config.partitions.clone()
            };
            if partitions.is_empty() {
                return Err(SourceError::Config("no partitions found in ECO_LOCAL_DIR"));
            }

            info!(dir = %dir.display(), partitions = partitions.len(), "Loading partitions from directory");
            load_openings(&fetcher, &partitions).await
        }
        None => {
            if config.partitions.is_empty() {
                return Err(SourceError::Config("no partitions configured"));
            }

            info!(base_url = %config.base_url, "Loading partitions over HTTP");
            load_openings(&HttpFetcher::new(config)?, &config.partitions).await
        }
    };

    let tree = build_opening_tree_with(&report.openings, policy);
    info!(nodes = tree.len(), roots = tree.roots().count(), "Built opening tree");
    Ok((tree, report))
}
