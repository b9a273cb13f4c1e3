//! Markdown document extractor — line-by-line state machine.
//!
//! The only state that matters for structure is whether the scanner is inside
//! a fenced code block: a `## ` line inside a fence is code, not a heading.
//! Links are scanned over the raw text regardless of fences.

use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(\S.*?)[ \t]*$").unwrap());

static RE_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##[ \t]+(\S.*?)[ \t]*$").unwrap());

static RE_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\*\*Category\*\*:[ \t]*(.*?)[ \t]*$").unwrap());

static RE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\*\*Definition\*\*:[ \t]*(.*?)[ \t]*$").unwrap());

static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*```[ \t]*([^`\s]*)").unwrap());

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static RE_TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?[ \t]*:?-+:?[ \t]*(\|[ \t]*:?-+:?[ \t]*)*\|?$").unwrap());

// -- Parser state -------------------------------------------------------------

#[derive(Default)]
struct ParserState {
    title: Option<String>,
    category: Option<String>,
    definition: Option<String>,
    sections: Vec<Section>,
    code_blocks: Vec<CodeBlock>,

    // Section being accumulated
    open_section: Option<OpenSection>,

    // Fence being accumulated
    fence: Option<OpenFence>,
}

struct OpenSection {
    heading: String,
    line: usize,
    body: Vec<String>,
}

struct OpenFence {
    lang: Option<String>,
    line: usize,
    body: Vec<String>,
}

impl ParserState {
    fn close_section(&mut self) {
        if let Some(open) = self.open_section.take() {
            self.sections.push(Section {
                heading: open.heading,
                body: open.body.join("\n"),
                line: open.line,
            });
        }
    }

    fn push_body_line(&mut self, line: &str) {
        if let Some(ref mut open) = self.open_section {
            open.body.push(line.to_string());
        }
    }

    fn current_heading(&self) -> Option<String> {
        self.open_section.as_ref().map(|s| s.heading.clone())
    }
}

// -- Public API ---------------------------------------------------------------

/// Extract a document record from raw markdown. Never fails: missing parts
/// are simply absent from the result.
pub fn parse(path: &str, kind: DocumentKind, input: &str) -> Document {
    let mut state = ParserState::default();

    for (idx, line) in input.lines().enumerate() {
        process_line(&mut state, idx + 1, line);
    }

    // An unterminated fence is not a code block.
    state.fence = None;
    state.close_section();

    Document {
        path: path.to_string(),
        kind,
        title: state.title,
        category: state.category,
        definition: state.definition,
        sections: state.sections,
        links: extract_links(input),
        code_blocks: state.code_blocks,
    }
}

/// Every `[text](target)` occurrence with its 1-based line number.
pub fn extract_links(input: &str) -> Vec<Link> {
    let mut links = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    for caps in RE_LINK.captures_iter(input) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(scanned);
        line += input[scanned..start].matches('\n').count();
        scanned = start;
        links.push(Link {
            text: caps[1].to_string(),
            target: caps[2].trim().to_string(),
            line,
        });
    }

    links
}

/// An inline `` `code` `` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub text: String,
    /// 1-based line within the scanned text.
    pub line: usize,
}

/// Every inline code span outside fenced blocks.
pub fn inline_code_spans(text: &str) -> Vec<CodeSpan> {
    let prose = strip_fenced(text);
    RE_INLINE_CODE
        .captures_iter(&prose)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            CodeSpan {
                text: caps[1].to_string(),
                line: prose[..start].matches('\n').count() + 1,
            }
        })
        .collect()
}

/// Lower-cased text with `**` emphasis and backticks removed.
pub fn plain_text(text: &str) -> String {
    text.replace("**", "").replace('`', "").trim().to_lowercase()
}

/// Replace the lines of fenced blocks (fences included) with empty lines.
pub fn strip_fenced(text: &str) -> String {
    let mut in_fence = false;
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        if RE_FENCE.is_match(line) {
            in_fence = !in_fence;
            out.push("");
        } else if in_fence {
            out.push("");
        } else {
            out.push(line);
        }
    }
    out.join("\n")
}

/// Text with fence marker lines removed, the way a renderer would show it.
pub fn without_fence_markers(text: &str) -> String {
    text.lines()
        .filter(|line| !RE_FENCE.is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Data rows of every pipe table in `text`, split into trimmed cells.
///
/// The first row of each table is treated as the header and skipped, as are
/// separator rows (`|---|:---:|`).
pub fn table_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut in_table = false;

    for line in strip_fenced(text).lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('|') {
            in_table = false;
            continue;
        }
        if RE_TABLE_SEPARATOR.is_match(trimmed) {
            continue;
        }
        if !in_table {
            // header row
            in_table = true;
            continue;
        }
        let cells: Vec<String> = trimmed
            .split('|')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    rows
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, lineno: usize, line: &str) {
    // 1. Fence open/close. The fence line itself stays in the section body.
    if let Some(caps) = RE_FENCE.captures(line) {
        match s.fence.take() {
            Some(open) => {
                s.code_blocks.push(CodeBlock {
                    lang: open.lang,
                    body: open.body.join("\n"),
                    line: open.line,
                    section: s.current_heading(),
                });
            }
            None => {
                let tag = caps[1].to_string();
                s.fence = Some(OpenFence {
                    lang: if tag.is_empty() { None } else { Some(tag) },
                    line: lineno,
                    body: Vec::new(),
                });
            }
        }
        s.push_body_line(line);
        return;
    }

    // 2. Inside a fence: code, never structure.
    if let Some(ref mut open) = s.fence {
        open.body.push(line.to_string());
        s.push_body_line(line);
        return;
    }

    // 3. Section heading closes the previous section.
    if let Some(caps) = RE_SECTION.captures(line) {
        s.close_section();
        s.open_section = Some(OpenSection {
            heading: caps[1].to_string(),
            line: lineno,
            body: Vec::new(),
        });
        return;
    }

    // 4. Title (first one wins).
    if s.title.is_none() {
        if let Some(caps) = RE_TITLE.captures(line) {
            s.title = Some(caps[1].to_string());
            return;
        }
    }

    // 5. Metadata fields (first one wins).
    if s.category.is_none() {
        if let Some(caps) = RE_CATEGORY.captures(line) {
            s.category = Some(caps[1].to_string());
        }
    }
    if s.definition.is_none() {
        if let Some(caps) = RE_DEFINITION.captures(line) {
            s.definition = Some(caps[1].to_string());
        }
    }

    s.push_body_line(line);
}
