//! Corpus input boundary: the set of (path, text) pairs to validate and the
//! existence predicate links are resolved against.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::DocumentKind;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Root-relative path with `/` separators.
    pub path: String,
    pub content: String,
}

/// Raw documents of one run, sorted by path with no duplicates.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: Vec<SourceFile>,
}

impl Corpus {
    /// Build from in-memory pairs. On duplicate paths the first one wins.
    pub fn new<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut files: Vec<SourceFile> = files
            .into_iter()
            .map(|(p, c)| SourceFile {
                path: normalize_separators(&p.into()),
                content: c.into(),
            })
            .filter(|f| seen.insert(f.path.clone()))
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self { files }
    }

    /// Load every document under `root` matching the config's include
    /// patterns and none of its exclude patterns.
    ///
    /// The index is always loaded; if it cannot be found the run is over.
    pub fn discover(root: &Path, config: &Config) -> Result<Self> {
        let index_path = root.join(&config.index);
        if !index_path.is_file() {
            return Err(Error::IndexNotFound(index_path));
        }

        let excludes = compile_patterns(&config.exclude)?;
        let mut files: Vec<(String, String)> = Vec::new();

        for path in expand_globs(root, &config.include)? {
            let rel = relative(root, &path);
            if rel != config.index && excludes.iter().any(|p| p.matches(&rel)) {
                debug!(path = %rel, "excluded");
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => files.push((rel, content)),
                Err(source) if rel == config.index => {
                    return Err(Error::Read { path, source });
                }
                Err(e) => {
                    warn!(path = %rel, error = %e, "skipping unreadable document");
                }
            }
        }

        if !files.iter().any(|(p, _)| *p == config.index) {
            let content = fs::read_to_string(&index_path).map_err(|source| Error::Read {
                path: index_path.clone(),
                source,
            })?;
            files.push((config.index.clone(), content));
        }

        Ok(Self::new(files))
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Existence predicate over exactly the loaded documents.
    pub fn file_set(&self) -> FileSet {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Role of `path` under the given config.
pub fn classify(path: &str, config: &Config) -> DocumentKind {
    if path == config.index {
        DocumentKind::Index
    } else if path.starts_with(&config.dictionary_prefix()) {
        DocumentKind::Entry
    } else {
        DocumentKind::Auxiliary
    }
}

/// Answers whether a root-relative path exists, without reading it.
pub trait PathExists {
    fn exists(&self, path: &str) -> bool;
}

/// In-memory path set. Parent directories of every file also exist.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
}

impl FileSet {
    pub fn insert(&mut self, path: impl Into<String>) {
        let path = normalize_separators(&path.into());
        let mut dir = path.as_str();
        while let Some(pos) = dir.rfind('/') {
            dir = &dir[..pos];
            self.dirs.insert(dir.to_string());
        }
        self.files.insert(path);
    }
}

impl<S: Into<String>> FromIterator<S> for FileSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = FileSet::default();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

impl PathExists for FileSet {
    fn exists(&self, path: &str) -> bool {
        path.is_empty() || self.files.contains(path) || self.dirs.contains(path)
    }
}

/// Existence checks against the filesystem below `root`.
#[derive(Debug, Clone)]
pub struct DiskFiles {
    root: PathBuf,
}

impl DiskFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PathExists for DiskFiles {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| Error::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Expand root-relative glob patterns into file paths, sorted and deduplicated.
fn expand_globs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = Vec::new();
    for pattern in patterns {
        let full = format!("{}/{}", escaped_root.trim_end_matches('/'), pattern);
        let matches: Vec<_> = glob::glob(&full)
            .map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            debug!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_separators(&rel.to_string_lossy())
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}
