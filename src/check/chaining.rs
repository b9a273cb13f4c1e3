//! Command chaining grammar.
//!
//! A chaining expression is an inline code span in the index's chaining
//! section joining command segments with `then` (sequential) or `and`
//! (parallel). Segments are the word runs between keyword words, so two
//! adjacent keywords leave an empty segment between them.

use super::schema::COMMAND_CHAINING;
use super::Context;
use crate::model::{Document, Finding, FindingKind};
use crate::parser::markdown::inline_code_spans;
use regex::Regex;
use std::sync::LazyLock;

pub const SEQUENTIAL: &str = "then";
pub const PARALLEL: &str = "and";

static RE_SEQUENTIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bthen\b").unwrap());

static RE_PARALLEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\band\b").unwrap());

static RE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(then|and)\b").unwrap());

/// A span counts as a chaining expression when a keyword appears with a
/// space on both sides.
pub fn is_chaining_expression(span: &str) -> bool {
    span.contains(" then ") || span.contains(" and ")
}

/// Keyword occurrences anywhere in the expression, as whole words.
pub fn keyword_count(expr: &str) -> usize {
    RE_KEYWORD.find_iter(expr).count()
}

/// Split on keyword words. Segment text is re-joined with single spaces.
pub fn split_segments(expr: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in expr.split_whitespace() {
        if word == SEQUENTIAL || word == PARALLEL {
            segments.push(current.join(" "));
            current.clear();
        } else {
            current.push(word);
        }
    }
    segments.push(current.join(" "));
    segments
}

fn leading_word(segment: &str) -> Option<&str> {
    segment.split_whitespace().next()
}

/// Findings for the index's chaining section.
pub fn check(index: &Document, ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    let grammar = |message: String| Finding::error(FindingKind::Grammar, message).at(&index.path);

    let Some(section) = index.section(COMMAND_CHAINING) else {
        findings.push(grammar(format!(
            "no `## {}` section to check",
            COMMAND_CHAINING
        )));
        return findings;
    };
    let body = section.body.as_str();

    let min = ctx.config.thresholds.min_chaining_chars;
    let length = body.trim().chars().count();
    if length < min {
        findings.push(
            grammar(format!(
                "chaining section too brief ({} chars, need {})",
                length, min
            ))
            .line(section.line),
        );
    }

    for (keyword, re) in [(SEQUENTIAL, &RE_SEQUENTIAL), (PARALLEL, &RE_PARALLEL)] {
        if !re.is_match(body) {
            findings.push(
                grammar(format!("chaining keyword `{}` is never used", keyword))
                    .line(section.line),
            );
        }
    }

    let lower = body.to_lowercase();
    for framing in ["sequential", "parallel"] {
        if !lower.contains(framing) {
            findings.push(
                grammar(format!("chaining section should explain {} operations", framing))
                    .line(section.line),
            );
        }
    }

    let expressions: Vec<_> = inline_code_spans(body)
        .into_iter()
        .filter(|span| is_chaining_expression(&span.text))
        .collect();

    if expressions.is_empty() {
        findings.push(
            grammar("no chaining examples with `then`/`and` found".to_string())
                .line(section.line),
        );
        return findings;
    }

    for span in &expressions {
        let line = section.line + span.line;
        findings.extend(
            check_expression(&span.text, ctx)
                .into_iter()
                .map(|f| f.at(&index.path).line(line)),
        );
    }

    if !expressions.iter().any(|span| keyword_count(&span.text) >= 2) {
        findings.push(
            Finding::warning("no complex workflow example (two or more chaining keywords)")
                .at(&index.path)
                .line(section.line),
        );
    }

    findings
}

/// Grammar and vocabulary findings for one expression, without location.
pub fn check_expression(expr: &str, ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    let grammar = |message: String| Finding::error(FindingKind::Grammar, message);
    let segments = split_segments(expr);

    // Reachable only for callers that skip `is_chaining_expression`.
    if segments.len() < 2 {
        findings.push(grammar(format!(
            "chain needs at least 2 segments: `{}`",
            expr
        )));
    }

    for (i, segment) in segments.iter().enumerate() {
        if segment.trim().is_empty() {
            findings.push(grammar(format!(
                "empty segment {} in chain: `{}`",
                i + 1,
                expr
            )));
        }
    }

    for segment in &segments {
        let Some(word) = leading_word(segment) else {
            continue;
        };
        if !ctx.vocabulary.recognizes(word, ctx.matcher.as_ref()) {
            findings.push(grammar(format!(
                "unknown command \"{}\" in `{}`",
                word, expr
            )));
        }
    }

    if keyword_count(expr) >= 2 {
        if segments.len() < 3 {
            findings.push(grammar(format!(
                "complex workflow should have at least 3 segments: `{}`",
                expr
            )));
        }
        let verbs: Vec<Option<String>> = segments
            .iter()
            .map(|s| leading_word(s).map(str::to_lowercase))
            .collect();
        for pair in verbs.windows(2) {
            if let [Some(prev), Some(next)] = pair {
                if prev == next {
                    findings.push(grammar(format!(
                        "repeated consecutive verb \"{}\" in workflow: `{}`",
                        next, expr
                    )));
                }
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testutil::{context, INDEX};
    use crate::model::DocumentKind;
    use crate::parser::parse_document;

    fn index_ctx() -> Context {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        context(&index)
    }

    #[test]
    fn classify_expressions() {
        assert!(is_chaining_expression("analyze this then optimize it"));
        assert!(is_chaining_expression("test this and document that"));
        assert!(!is_chaining_expression("then"));
        assert!(!is_chaining_expression("analyze this codebase"));
        assert!(!is_chaining_expression("standard input"));
    }

    #[test]
    fn split_on_keywords() {
        assert_eq!(
            split_segments("analyze this system then optimize this performance"),
            vec!["analyze this system", "optimize this performance"]
        );
        assert_eq!(
            split_segments("debug this issue then fix this problem then then test"),
            vec!["debug this issue", "fix this problem", "", "test"]
        );
    }

    #[test]
    fn sequential_chain_is_valid() {
        let ctx = index_ctx();
        assert_eq!(
            check_expression("analyze this system then optimize this performance", &ctx),
            vec![]
        );
    }

    #[test]
    fn parallel_chain_with_uppercase_verbs() {
        let ctx = index_ctx();
        assert_eq!(
            check_expression("SELECT user data and CREATE backup file", &ctx),
            vec![]
        );
    }

    #[test]
    fn doubled_keyword_leaves_empty_segment() {
        let ctx = index_ctx();
        let findings = check_expression("debug this issue then fix this problem then then test", &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::Grammar);
        assert!(findings[0].message.contains("empty segment 3"));
    }

    #[test]
    fn unknown_leading_word() {
        let ctx = index_ctx();
        let findings = check_expression("deploy this service then monitor it", &ctx);
        let words: Vec<&str> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            words,
            vec![
                "unknown command \"deploy\" in `deploy this service then monitor it`",
                "unknown command \"monitor\" in `deploy this service then monitor it`",
            ]
        );
    }

    #[test]
    fn repeated_verb_in_complex_workflow() {
        let ctx = index_ctx();
        let findings = check_expression("test this then Test that then document it", &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("repeated consecutive verb \"test\""));
    }

    #[test]
    fn single_segment_is_not_a_chain() {
        let ctx = index_ctx();
        let findings = check_expression("analyze this", &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("at least 2 segments"));
    }

    #[test]
    fn complex_workflow_needs_three_segments() {
        let ctx = index_ctx();
        // The second keyword is glued to punctuation, so it does not split.
        let findings = check_expression("analyze this then, and review it", &ctx);
        assert!(findings
            .iter()
            .any(|f| f.message.contains("at least 3 segments")));
    }

    #[test]
    fn well_formed_section_is_clean() {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        assert_eq!(check(&index, &ctx), vec![]);
    }

    #[test]
    fn expression_findings_carry_line() {
        let text = INDEX.replacen(
            "debug this issue then fix this problem then test this solution",
            "debug this issue then fix this problem then then test",
            1,
        );
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, &text);
        let ctx = context(&index);
        let findings = check(&index, &ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, Some(11));
        assert_eq!(findings[0].path.as_deref(), Some("information-dense-keywords.md"));
    }

    #[test]
    fn missing_complex_example_warns() {
        let text = INDEX.replacen(
            "- `debug this issue then fix this problem then test this solution`",
            "- `debug this issue`",
            1,
        );
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, &text);
        let ctx = context(&index);
        let findings = check(&index, &ctx);
        assert_eq!(findings.len(), 1);
        assert!(!findings[0].is_error());
        assert!(findings[0].message.contains("no complex workflow example"));
        assert_eq!(findings[0].line, Some(5));
    }

    fn chaining_section(length: usize) -> Document {
        let base = "Sequential and parallel: `analyze this then test this and document this`";
        let body = format!("{}{}", base, ".".repeat(length - base.chars().count()));
        parse_document(
            "information-dense-keywords.md",
            DocumentKind::Index,
            &format!(
                "# Information Dense Keywords Dictionary\n\n## Command Chaining\n\n{}\n",
                body
            ),
        )
    }

    #[test]
    fn chaining_length_boundary() {
        let index = chaining_section(100);
        let ctx = context(&index);
        assert_eq!(check(&index, &ctx), vec![]);

        let index = chaining_section(99);
        let findings = check(&index, &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("too brief (99 chars, need 100)"));
    }

    #[test]
    fn section_requirements() {
        let index = parse_document(
            "information-dense-keywords.md",
            DocumentKind::Index,
            "# Information Dense Keywords Dictionary\n\n## Command Chaining\n\nShort.\n",
        );
        let ctx = context(&index);
        let messages: Vec<String> = check(&index, &ctx).into_iter().map(|f| f.message).collect();
        assert_eq!(messages.len(), 6);
        assert!(messages[0].contains("too brief"));
        assert!(messages[1].contains("`then`"));
        assert!(messages[2].contains("`and`"));
        assert!(messages[3].contains("sequential"));
        assert!(messages[4].contains("parallel"));
        assert!(messages[5].contains("no chaining examples"));
    }

    #[test]
    fn missing_section() {
        let index = parse_document(
            "information-dense-keywords.md",
            DocumentKind::Index,
            "# Information Dense Keywords Dictionary\n",
        );
        let ctx = context(&index);
        let findings = check(&index, &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_error());
    }
}
