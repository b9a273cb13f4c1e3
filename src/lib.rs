//! idkcheck — validator for the Information Dense Keywords dictionary.
//!
//! A run loads the index document and every dictionary entry, extracts
//! their markdown structure, and checks schema conformance, link integrity,
//! category placement and the command chaining grammar. Content problems
//! are reported as findings in a [`model::Report`]; only an unreadable
//! corpus or invalid configuration is an [`Error`].

pub mod check;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

pub use error::{Error, Result};

use config::Config;
use corpus::{Corpus, DiskFiles};
use model::Report;
use std::path::Path;

/// Discover the corpus below `root` and validate it, resolving links
/// against the filesystem.
pub fn validate_dir(root: &Path, config: &Config) -> Result<Report> {
    let corpus = Corpus::discover(root, config)?;
    check::run(&corpus, config, Box::new(DiskFiles::new(root)))
}
