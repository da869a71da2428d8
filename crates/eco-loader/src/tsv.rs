//! Tab-separated partition parsing.
//!
//! The first line is a header; the `name` and `moves` columns are required
//! (`uci` is accepted in place of `moves`). Malformed rows are skipped and
//! recorded with their line number rather than failing the partition.

use opening_core::error::ParseError;
use opening_core::moves::{parse_line, Opening};
use tracing::warn;

use crate::error::SourceError;

/// Openings parsed from one partition plus the rows that were skipped.
#[derive(Debug, Default)]
pub struct ParsedPartition {
    pub openings: Vec<Opening>,
    /// One `SourceError::Parse` per skipped row, in file order
    pub rejected: Vec<SourceError>,
}

impl ParsedPartition {
    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }

    fn reject(&mut self, partition: &str, row: usize, source: ParseError) {
        let err = SourceError::Parse {
            partition: partition.to_string(),
            row,
            source,
        };
        warn!("Skipping row: {err}");
        self.rejected.push(err);
    }
}

pub fn parse_partition(partition: &str, text: &str) -> Result<ParsedPartition, SourceError> {
    let mut lines = text.lines().enumerate();

    let header: Vec<&str> = lines
        .next()
        .map(|(_, line)| line.split('\t').map(str::trim).collect())
        .unwrap_or_default();

    let name_col = column(&header, &["name"]).ok_or_else(|| SourceError::MissingColumn {
        partition: partition.to_string(),
        column: "name",
    })?;
    let moves_col = column(&header, &["moves", "uci"]).ok_or_else(|| SourceError::MissingColumn {
        partition: partition.to_string(),
        column: "moves",
    })?;

    let mut parsed = ParsedPartition::default();

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = idx + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        let Some(name) = fields.get(name_col) else {
            parsed.reject(partition, row, ParseError::MissingField { column: "name" });
            continue;
        };
        let Some(moves) = fields.get(moves_col) else {
            parsed.reject(partition, row, ParseError::MissingField { column: "moves" });
            continue;
        };

        match parse_line(moves) {
            Ok(moves) => parsed.openings.push(Opening::new(name.trim(), moves)),
            Err(e) => parsed.reject(partition, row, e),
        }
    }

    Ok(parsed)
}

fn column(header: &[&str], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| header.iter().position(|h| h == name))
}
