//! Build the opening tree and write it as nested JSON.
//!
//! Usage: cargo run --bin export-tree -- [out.json] [--pgn-dir DIR] [--longest-name]
//!
//! Without an output path the JSON goes to stdout. Every `*.pgn` in `--pgn-dir`
//! is merged in as a standalone custom opening.

use eco_loader::{load_tree, SourceConfig};
use opening_core::opening_tree::{CollisionPolicy, OpeningTree};
use opening_core::pgn::{opening_name, parse_pgn_moves};
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn merge_pgn_dir(tree: &mut OpeningTree, dir: &str) -> anyhow::Result<usize> {
    let pattern = format!("{}/*.pgn", dir);
    let mut merged = 0;

    for path in glob::glob(&pattern)?.filter_map(|p| p.ok()) {
        let pgn = fs::read_to_string(&path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Custom Opening".to_string());

        let moves = match parse_pgn_moves(&pgn) {
            Ok(moves) => moves,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };

        match tree.merge_custom(&opening_name(&pgn, &stem), moves) {
            Ok(_) => merged += 1,
            Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
        }
    }

    Ok(merged)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut output = None;
    let mut pgn_dir = None;
    let mut policy = CollisionPolicy::KeepFirst;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--pgn-dir" => {
                pgn_dir = args.get(i + 1).cloned();
                i += 2;
            }
            "--longest-name" => {
                policy = CollisionPolicy::KeepLongestName;
                i += 1;
            }
            path => {
                output = Some(path.to_string());
                i += 1;
            }
        }
    }

    let config = SourceConfig::from_env();
    let (mut tree, report) = load_tree(&config, policy).await?;

    if report.openings.is_empty() {
        anyhow::bail!("No openings loaded ({} partitions failed)", report.failed_partitions());
    }

    if let Some(dir) = pgn_dir {
        let merged = merge_pgn_dir(&mut tree, &dir)?;
        tracing::info!("Merged {} custom openings from {}", merged, dir);
    }

    let json = serde_json::to_string_pretty(&tree.to_json())?;
    match output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("Wrote {} openings to {}", tree.len(), path);
        }
        None => println!("{json}"),
    }

    eprintln!(
        "  Partitions failed: {}, rows skipped: {}",
        report.failed_partitions(),
        report.skipped_rows
    );

    Ok(())
}
