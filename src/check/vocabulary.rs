//! Command vocabulary and the matchers used to test words against it.
//!
//! The vocabulary is the first column of the index's Quick Reference table.
//! Prose abbreviates and conjugates command names, so the default matcher is
//! a loose bidirectional substring test.

use super::Context;
use crate::error::{Error, Result};
use crate::model::{Document, DocumentKind, Finding, FindingKind};
use crate::parser::markdown::{plain_text, table_rows};

pub const QUICK_REFERENCE: &str = "Quick Reference";

/// Verb fragments accepted even when absent from the Quick Reference table.
pub const FALLBACK_VERBS: &[&str] = &[
    "analyze", "debug", "optimize", "test", "document", "explain", "research", "review", "plan",
    "spec", "select", "create", "delete", "fix", "commit", "push", "gh", "pr", "comment",
];

/// Decides whether a candidate word names a known command.
///
/// Both arguments arrive lower-cased.
pub trait CommandMatcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn matches(&self, word: &str, known: &str) -> bool;
}

/// Either string contains the other.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl CommandMatcher for SubstringMatcher {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn matches(&self, word: &str, known: &str) -> bool {
        word.contains(known) || known.contains(word)
    }
}

/// The word equals the known name, or its first word.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactMatcher;

impl CommandMatcher for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn matches(&self, word: &str, known: &str) -> bool {
        word == known || known.split_whitespace().next() == Some(word)
    }
}

/// Levenshtein distance to the known name's first word is within bounds.
#[derive(Debug, Clone, Copy)]
pub struct EditDistanceMatcher {
    pub max_distance: usize,
}

impl CommandMatcher for EditDistanceMatcher {
    fn name(&self) -> &'static str {
        "edit-distance"
    }

    fn matches(&self, word: &str, known: &str) -> bool {
        let head = known.split_whitespace().next().unwrap_or(known);
        levenshtein(word, head) <= self.max_distance
    }
}

/// Build the matcher named in the config.
pub fn matcher_for(name: &str, max_distance: usize) -> Result<Box<dyn CommandMatcher>> {
    match name {
        "substring" => Ok(Box::new(SubstringMatcher)),
        "exact" => Ok(Box::new(ExactMatcher)),
        "edit-distance" | "levenshtein" => Ok(Box::new(EditDistanceMatcher { max_distance })),
        _ => Err(Error::UnknownMatcher(name.to_string())),
    }
}

/// Simple Levenshtein distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        cur[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Known command names, normalized to plain lower-case text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    commands: Vec<String>,
}

impl Vocabulary {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut commands: Vec<String> = commands
            .into_iter()
            .map(|c| plain_text(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        commands.dedup();
        Self { commands }
    }

    /// First column of the index's Quick Reference table.
    pub fn from_index(index: &Document) -> Self {
        match index.section(QUICK_REFERENCE) {
            Some(section) => Self::new(
                table_rows(&section.body)
                    .into_iter()
                    .filter_map(|row| row.into_iter().next()),
            ),
            None => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether `word` names a known command or a fallback verb.
    pub fn recognizes(&self, word: &str, matcher: &dyn CommandMatcher) -> bool {
        let word = word.to_lowercase();
        self.commands.iter().any(|c| matcher.matches(&word, c))
            || FALLBACK_VERBS.iter().any(|v| matcher.matches(&word, v))
    }
}

/// Every Quick Reference row should name a command with an entry document.
pub fn check_coverage(docs: &[Document], ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    let Some(index) = docs.iter().find(|d| d.kind == DocumentKind::Index) else {
        return findings;
    };
    let Some(section) = index.section(QUICK_REFERENCE) else {
        // reported by the schema check
        return findings;
    };

    let rows = table_rows(&section.body);
    if rows.is_empty() {
        findings.push(
            Finding::error(
                FindingKind::Structural,
                "Quick Reference table has no command rows",
            )
            .at(&index.path)
            .line(section.line),
        );
        return findings;
    }

    let entries: Vec<&str> = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Entry)
        .map(|d| d.path.as_str())
        .collect();

    for row in &rows {
        let command = plain_text(&row[0]);
        let slug = command.split_whitespace().collect::<Vec<_>>().join("-");
        let found = entries.iter().any(|path| {
            let stem = path
                .rsplit('/')
                .next()
                .and_then(|f| f.strip_suffix(".md"))
                .unwrap_or(path);
            stem == slug || path.contains(&slug)
        });
        if !found {
            findings.push(
                Finding::warning(format!(
                    "Quick Reference command `{}` has no entry in {}",
                    row[0], ctx.config.dictionary
                ))
                .at(&index.path),
            );
        }
    }

    findings
}
