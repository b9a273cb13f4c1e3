//! Run configuration, optionally loaded from `idkcheck.toml`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File name looked up in the corpus root when no `--config` is given.
pub const CONFIG_FILE: &str = "idkcheck.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Corpus-relative path of the index document.
    pub index: String,
    /// Corpus-relative root of the entry documents.
    pub dictionary: String,
    /// Exact title the index must carry.
    pub index_title: String,
    /// Glob patterns (relative to the root) of documents to load.
    pub include: Vec<String>,
    /// Glob patterns excluded from `include`.
    pub exclude: Vec<String>,
    /// Link targets starting with any of these are never resolved.
    pub exempt_prefixes: Vec<String>,
    /// Vocabulary matcher: `substring`, `exact` or `edit-distance`.
    pub matcher: String,
    pub max_edit_distance: usize,
    pub thresholds: Thresholds,
    /// Category directory name → canonical label.
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub min_output_format_chars: usize,
    pub min_chaining_chars: usize,
    pub min_example_prompts: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_output_format_chars: 50,
            min_chaining_chars: 100,
            min_example_prompts: 2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: "information-dense-keywords.md".to_string(),
            dictionary: "dictionary".to_string(),
            index_title: "Information Dense Keywords Dictionary".to_string(),
            include: vec!["**/*.md".to_string()],
            exclude: vec![
                "node_modules/**".to_string(),
                "target/**".to_string(),
                "CHANGELOG.md".to_string(),
            ],
            exempt_prefixes: vec![
                "http://".to_string(),
                "https://".to_string(),
                "docs/".to_string(),
            ],
            matcher: "substring".to_string(),
            max_edit_distance: 2,
            thresholds: Thresholds::default(),
            categories: default_categories(),
        }
    }
}

fn default_categories() -> BTreeMap<String, String> {
    [
        ("core", "Core Commands"),
        ("development", "Development Commands"),
        ("documentation", "Documentation Commands"),
        ("quality-assurance", "Quality Assurance Commands"),
        ("workflow", "Workflow Commands"),
        ("git", "Git Operations"),
    ]
    .into_iter()
    .map(|(dir, label)| (dir.to_string(), label.to_string()))
    .collect()
}

impl Config {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else `<root>/idkcheck.toml` if present,
    /// else the defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let candidate = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.join(CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = fs::read_to_string(&candidate).map_err(|source| Error::Read {
            path: candidate.clone(),
            source,
        })?;
        Self::from_toml(&candidate, &content)
    }

    /// `dictionary` with a trailing `/`, for prefix tests on paths.
    pub fn dictionary_prefix(&self) -> String {
        format!("{}/", self.dictionary.trim_end_matches('/'))
    }
}
