//! Checkers and the run orchestrator.
//!
//! Every checker is a pure function of the extracted documents and the
//! per-run [`Context`]; the orchestrator owns the finding list.

pub mod category;
pub mod chaining;
pub mod links;
pub mod schema;
pub mod vocabulary;

use crate::config::Config;
use crate::corpus::{classify, Corpus, PathExists};
use crate::error::{Error, Result};
use crate::model::{Document, DocumentKind, Finding, Report};
use crate::parser::parse_document;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use vocabulary::{matcher_for, CommandMatcher, Vocabulary};

/// Read-only state shared by all checkers for one run.
pub struct Context {
    pub config: Config,
    pub vocabulary: Vocabulary,
    pub matcher: Box<dyn CommandMatcher>,
    pub files: Box<dyn PathExists>,
}

impl Context {
    pub fn new(config: Config, index: &Document, files: Box<dyn PathExists>) -> Result<Self> {
        let matcher = matcher_for(&config.matcher, config.max_edit_distance)?;
        let vocabulary = Vocabulary::from_index(index);
        if vocabulary.is_empty() {
            warn!("no Quick Reference commands found, only fallback verbs are recognized");
        }
        debug!(
            commands = vocabulary.len(),
            matcher = matcher.name(),
            "built command vocabulary"
        );
        Ok(Self {
            config,
            vocabulary,
            matcher,
            files,
        })
    }
}

/// Extract every document of the corpus and validate them.
///
/// Fails only when the index is absent from the corpus or the config names
/// an unknown matcher.
pub fn run(corpus: &Corpus, config: &Config, files: Box<dyn PathExists>) -> Result<Report> {
    if corpus.is_empty() {
        return Err(Error::IndexNotFound(PathBuf::from(&config.index)));
    }
    debug!(documents = corpus.len(), "extracting corpus");

    let docs: Vec<Document> = corpus
        .files()
        .iter()
        .map(|f| parse_document(&f.path, classify(&f.path, config), &f.content))
        .collect();

    let index = docs
        .iter()
        .find(|d| d.kind == DocumentKind::Index)
        .ok_or_else(|| Error::IndexNotFound(PathBuf::from(&config.index)))?;

    let ctx = Context::new(config.clone(), index, files)?;
    Ok(validate(&docs, &ctx))
}

/// Run all checkers in their fixed order over already-extracted documents.
pub fn validate(docs: &[Document], ctx: &Context) -> Report {
    let mut findings: Vec<Finding> = Vec::new();

    let mut stage = |name: &str, found: Vec<Finding>| {
        debug!(stage = name, findings = found.len(), "checker finished");
        findings.extend(found);
    };

    stage("schema", docs.iter().flat_map(|d| schema::check(d, ctx)).collect());
    stage(
        "category",
        docs.iter().flat_map(|d| category::check(d, ctx)).collect(),
    );
    stage("category-coverage", category::check_coverage(docs, ctx));

    let (link_findings, edges) = links::check(docs, ctx);
    stage("links", link_findings);
    stage("index-links", links::check_index_links(docs, ctx));
    stage("external-links", links::lint_external(docs));
    stage("quick-reference", vocabulary::check_coverage(docs, ctx));

    let chaining = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Index)
        .flat_map(|d| chaining::check(d, ctx))
        .collect();
    stage("chaining", chaining);

    let report = Report {
        documents: docs.len(),
        links: edges,
        findings,
    };
    info!(
        documents = report.documents,
        links = report.links,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );
    report
}
