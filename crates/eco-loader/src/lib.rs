//! Loads named move lines from ECO-style TSV partitions and builds the
//! opening tree from them.

pub mod config;
pub mod error;
pub mod fetch;
pub mod source;
pub mod tsv;

pub use config::SourceConfig;
pub use error::SourceError;
pub use source::{load_openings, load_tree, LoadReport};
