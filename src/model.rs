//! Data model for extracted documents and validation findings.
//!
//! Records here are built once by the extractor and only read afterwards.

use serde::Serialize;
use std::fmt;

/// Role a document plays in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// The master index cross-referencing every entry.
    Index,
    /// One command definition under the dictionary root.
    Entry,
    /// Any other markdown file. Only contributes links to the graph.
    Auxiliary,
}

/// One structured document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Corpus-relative path with `/` separators.
    pub path: String,
    pub kind: DocumentKind,
    /// First `# ` heading outside fenced code.
    pub title: Option<String>,
    /// `**Category**: ...`
    pub category: Option<String>,
    /// `**Definition**: ...`
    pub definition: Option<String>,
    /// `## ` sections in document order.
    pub sections: Vec<Section>,
    pub links: Vec<Link>,
    pub code_blocks: Vec<CodeBlock>,
}

impl Document {
    /// Body of the first section with the given heading.
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    pub fn has_section(&self, heading: &str) -> bool {
        self.section(heading).is_some()
    }

    /// Directory portion of `path` (empty for root-level documents).
    pub fn dir(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }
}

/// A second-level section and the raw text below its heading.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub body: String,
    /// 1-based line of the heading.
    pub line: usize,
}

/// An inline `[text](target)` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub target: String,
    /// 1-based line of the opening bracket.
    pub line: usize,
}

/// A matched pair of triple-backtick fences.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub lang: Option<String>,
    pub body: String,
    /// 1-based line of the opening fence.
    pub line: usize,
    /// Heading of the `## ` section the block sits in, if any.
    pub section: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Category of a finding, used for grouping in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Missing or invalid title, field or section.
    Structural,
    /// Unresolvable or mismatched cross-reference.
    Reference,
    /// Malformed chaining expression.
    Grammar,
    /// Informational only.
    Advisory,
}

/// One reported validation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Finding {
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    /// Warnings are always advisory.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind: FindingKind::Advisory,
            message: message.into(),
            path: None,
            line: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => write!(f, "{}:{}: {}", path, line, self.message),
            (Some(path), None) => write!(f, "{}: {}", path, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Outcome of a full validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub documents: usize,
    pub links: usize,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// A run succeeds iff it produced no errors.
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}
