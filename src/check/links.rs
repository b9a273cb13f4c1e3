//! Link graph: every non-exempt reference in every document, resolved
//! against the corpus file set.

use super::Context;
use crate::model::{Document, DocumentKind, Finding, FindingKind, Link};
use crate::parser::markdown::plain_text;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/\s]+\.[^/\s]+").unwrap());

/// A directed reference from a document to a target path.
#[derive(Debug, Clone)]
pub struct Edge<'a> {
    pub source: &'a Document,
    pub link: &'a Link,
    /// Root-relative target, `None` when it escapes the root.
    pub resolved: Option<String>,
}

impl Edge<'_> {
    /// Resolved path plus the link's `#fragment`, if any.
    fn target_key(&self) -> Option<String> {
        let resolved = self.resolved.as_deref()?;
        Some(match fragment(&self.link.target) {
            Some(anchor) => format!("{}#{}", resolved, anchor),
            None => resolved.to_string(),
        })
    }
}

fn fragment(target: &str) -> Option<&str> {
    target
        .split_once('#')
        .map(|(_, anchor)| anchor)
        .filter(|anchor| !anchor.is_empty())
}

/// External URLs and conventional external directories are never resolved.
pub fn is_exempt(target: &str, exempt_prefixes: &[String]) -> bool {
    exempt_prefixes.iter().any(|p| target.starts_with(p.as_str()))
}

/// Resolve `target` relative to the directory `source_dir`.
///
/// Fragments are dropped. A leading `/` means root-relative. `None` when the
/// path climbs above the root.
pub fn resolve(source_dir: &str, target: &str) -> Option<String> {
    let target = target.split('#').next().unwrap_or(target);
    let target = target.split('?').next().unwrap_or(target);

    let joined = match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None if source_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", source_dir, target),
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in joined.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Every non-exempt edge, in document then link order.
pub fn build_graph<'a>(docs: &'a [Document], ctx: &Context) -> Vec<Edge<'a>> {
    let mut edges = Vec::new();
    for doc in docs {
        for link in &doc.links {
            if is_exempt(&link.target, &ctx.config.exempt_prefixes) {
                continue;
            }
            let resolved = if link.target.starts_with('#') {
                Some(doc.path.clone())
            } else {
                resolve(doc.dir(), &link.target)
            };
            edges.push(Edge {
                source: doc,
                link,
                resolved,
            });
        }
    }
    edges
}

/// Loose bidirectional containment after stripping emphasis and case.
pub fn titles_match(link_text: &str, title: &str) -> bool {
    let link = plain_text(link_text);
    let title = plain_text(title);
    link == title || link.contains(&title) || title.contains(&link)
}

/// Check the graph. Returns the findings and the number of edges checked.
pub fn check(docs: &[Document], ctx: &Context) -> (Vec<Finding>, usize) {
    let edges = build_graph(docs, ctx);
    let mut findings = Vec::new();

    // 1. Every edge must resolve.
    for edge in &edges {
        let exists = edge
            .resolved
            .as_deref()
            .is_some_and(|path| ctx.files.exists(path));
        if !exists {
            findings.push(
                Finding::error(
                    FindingKind::Reference,
                    format!("broken link to {}", edge.link.target),
                )
                .at(&edge.source.path)
                .line(edge.link.line),
            );
        }
    }

    // 2. One target, several display texts: cosmetic. Each fragment is its
    // own target, so in-page anchors never group with inbound links.
    let mut by_target: BTreeMap<String, Vec<&Edge>> = BTreeMap::new();
    for edge in &edges {
        if let Some(key) = edge.target_key() {
            by_target.entry(key).or_default().push(edge);
        }
    }
    for (target, refs) in &by_target {
        let mut texts: Vec<&str> = Vec::new();
        for edge in refs {
            if !texts.contains(&edge.link.text.as_str()) {
                texts.push(&edge.link.text);
            }
        }
        if texts.len() > 1 {
            let details: Vec<String> = refs
                .iter()
                .map(|e| format!("\"{}\" in {}", e.link.text, e.source.path))
                .collect();
            findings.push(Finding::warning(format!(
                "link text varies for {}: {}",
                target,
                details.join(", ")
            )));
        }
    }

    // 3. Index links into the dictionary must name their target.
    let by_path: HashMap<&str, &Document> = docs.iter().map(|d| (d.path.as_str(), d)).collect();
    let prefix = ctx.config.dictionary_prefix();
    for edge in edges.iter().filter(|e| e.source.kind == DocumentKind::Index) {
        let Some(target) = edge.resolved.as_deref() else {
            continue;
        };
        if !target.starts_with(&prefix) {
            continue;
        }
        let Some(title) = by_path.get(target).and_then(|d| d.title.as_deref()) else {
            continue;
        };
        if !titles_match(&edge.link.text, title) {
            findings.push(
                Finding::error(
                    FindingKind::Reference,
                    format!(
                        "link text \"{}\" doesn't match target title \"{}\"",
                        edge.link.text, title
                    ),
                )
                .at(&edge.source.path)
                .line(edge.link.line),
            );
        }
    }

    (findings, edges.len())
}

/// The index should reference at least one entry.
pub fn check_index_links(docs: &[Document], ctx: &Context) -> Vec<Finding> {
    let prefix = ctx.config.dictionary_prefix();
    docs.iter()
        .filter(|d| d.kind == DocumentKind::Index)
        .filter(|d| {
            !d.links
                .iter()
                .any(|l| resolve(d.dir(), &l.target).is_some_and(|t| t.starts_with(&prefix)))
        })
        .map(|d| Finding::warning(format!("index has no links into {}", prefix)).at(&d.path))
        .collect()
}

/// Format lint for external URLs. These never enter the graph.
pub fn lint_external(docs: &[Document]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for doc in docs {
        for link in &doc.links {
            let target = link.target.as_str();
            if !(target.starts_with("http://") || target.starts_with("https://")) {
                continue;
            }
            if target.starts_with("http://") {
                findings.push(
                    Finding::warning(format!("consider using HTTPS: {}", target))
                        .at(&doc.path)
                        .line(link.line),
                );
            }
            if target.chars().any(char::is_whitespace) || !RE_URL.is_match(target) {
                findings.push(
                    Finding::warning(format!("malformed URL: {}", target))
                        .at(&doc.path)
                        .line(link.line),
                );
            }
        }
    }
    findings
}
