//! Schema validation of a single document against the rules for its kind.

use super::Context;
use crate::model::{Document, DocumentKind, Finding, FindingKind};
use crate::parser::markdown::{inline_code_spans, without_fence_markers};

pub const COMMAND_CHAINING: &str = "Command Chaining";
pub const CORE_COMMANDS: &str = "Core Commands";
pub const QUICK_REFERENCE: &str = super::vocabulary::QUICK_REFERENCE;

pub const EXAMPLE_PROMPTS: &str = "Example Prompts";
pub const EXPECTED_OUTPUT: &str = "Expected Output Format";

const INDEX_SECTIONS: &[&str] = &[COMMAND_CHAINING, CORE_COMMANDS, QUICK_REFERENCE];
const ENTRY_SECTIONS: &[&str] = &[EXAMPLE_PROMPTS, EXPECTED_OUTPUT];

/// Findings for one document. Auxiliary documents have no schema.
pub fn check(doc: &Document, ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    match doc.kind {
        DocumentKind::Index => check_index(doc, ctx, &mut findings),
        DocumentKind::Entry => check_entry(doc, ctx, &mut findings),
        DocumentKind::Auxiliary => return findings,
    }
    check_code_blocks(doc, &mut findings);
    findings
}

fn structural(doc: &Document, message: impl Into<String>) -> Finding {
    Finding::error(FindingKind::Structural, message).at(&doc.path)
}

fn check_index(doc: &Document, ctx: &Context, findings: &mut Vec<Finding>) {
    let expected = ctx.config.index_title.as_str();
    match doc.title.as_deref() {
        None => findings.push(structural(
            doc,
            format!("missing title `# {}`", expected),
        )),
        Some(title) if title != expected => findings.push(structural(
            doc,
            format!("title `{}` should be `{}`", title, expected),
        )),
        Some(_) => {}
    }

    require_sections(doc, INDEX_SECTIONS, findings);
}

fn check_entry(doc: &Document, ctx: &Context, findings: &mut Vec<Finding>) {
    if doc.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        findings.push(structural(doc, "missing command title (H1)"));
    }

    match doc.category.as_deref().map(str::trim) {
        None => findings.push(structural(doc, "missing **Category** field")),
        Some("") => findings.push(structural(doc, "empty **Category** field")),
        Some(label) => {
            if !ctx.config.categories.values().any(|known| known == label) {
                findings.push(structural(
                    doc,
                    format!("unknown category `{}`", label),
                ));
            }
        }
    }

    match doc.definition.as_deref().map(str::trim) {
        None => findings.push(structural(doc, "missing **Definition** field")),
        Some("") => findings.push(structural(doc, "empty **Definition** field")),
        Some(_) => {}
    }

    require_sections(doc, ENTRY_SECTIONS, findings);
    check_example_prompts(doc, ctx, findings);
    check_expected_output(doc, ctx, findings);
}

fn require_sections(doc: &Document, required: &[&str], findings: &mut Vec<Finding>) {
    for heading in required {
        if !doc.has_section(heading) {
            findings.push(structural(
                doc,
                format!("missing required section `## {}`", heading),
            ));
        }
    }
}

fn check_example_prompts(doc: &Document, ctx: &Context, findings: &mut Vec<Finding>) {
    let Some(section) = doc.section(EXAMPLE_PROMPTS) else {
        return;
    };

    let bullets = section
        .body
        .lines()
        .filter(|line| line.starts_with("- "))
        .count();
    let min = ctx.config.thresholds.min_example_prompts;
    if bullets < min {
        findings.push(
            structural(
                doc,
                format!("needs at least {} example prompts, found {}", min, bullets),
            )
            .line(section.line),
        );
    }

    for span in inline_code_spans(&section.body) {
        if span.text.trim().is_empty() {
            findings.push(
                structural(doc, "empty inline code in example prompt")
                    .line(section.line + span.line),
            );
        }
    }
}

fn check_expected_output(doc: &Document, ctx: &Context, findings: &mut Vec<Finding>) {
    let Some(section) = doc.section(EXPECTED_OUTPUT) else {
        return;
    };

    let rendered = without_fence_markers(&section.body);
    let length = rendered.trim().chars().count();
    let min = ctx.config.thresholds.min_output_format_chars;
    if length < min {
        findings.push(
            structural(
                doc,
                format!(
                    "output format specification too brief ({} chars, need {})",
                    length, min
                ),
            )
            .line(section.line),
        );
    }

    let has_block = doc
        .code_blocks
        .iter()
        .any(|b| b.section.as_deref() == Some(EXPECTED_OUTPUT));
    if !has_block {
        findings.push(
            structural(doc, "output format should include a fenced code block")
                .line(section.line),
        );
    }
}

fn check_code_blocks(doc: &Document, findings: &mut Vec<Finding>) {
    for block in &doc.code_blocks {
        if block.body.trim().is_empty() {
            findings.push(
                Finding::warning("empty code block")
                    .at(&doc.path)
                    .line(block.line),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testutil::{context, ENTRY, INDEX};
    use crate::parser::parse_document;

    fn entry_findings(text: &str) -> Vec<Finding> {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        let doc = parse_document("dictionary/core/analyze-this.md", DocumentKind::Entry, text);
        check(&doc, &ctx)
    }

    #[test]
    fn valid_entry_has_no_findings() {
        assert_eq!(entry_findings(ENTRY), vec![]);
    }

    #[test]
    fn valid_index_has_no_findings() {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        assert_eq!(check(&index, &ctx), vec![]);
    }

    #[test]
    fn wrong_index_title() {
        let text = INDEX.replacen("# Information Dense Keywords Dictionary", "# Keywords", 1);
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, &text);
        let ctx = context(&index);
        let findings = check(&index, &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("title `Keywords`"));
    }

    #[test]
    fn each_missing_entry_element_is_named() {
        let cases = [
            ("**Category**: Core Commands\n", "**Category**"),
            ("**Definition**: Examine a system in depth.\n", "**Definition**"),
            ("## Example Prompts\n", "## Example Prompts"),
            ("## Expected Output Format\n", "## Expected Output Format"),
        ];
        for (line, name) in cases {
            let text = ENTRY.replacen(line, "", 1);
            let findings = entry_findings(&text);
            assert!(
                findings
                    .iter()
                    .any(|f| f.is_error() && f.message.contains(name)
                        && f.path.as_deref() == Some("dictionary/core/analyze-this.md")),
                "removing {} gave {:?}",
                name,
                findings
            );
        }
    }

    #[test]
    fn missing_title() {
        let text = ENTRY.replacen("# Analyze This\n", "", 1);
        let findings = entry_findings(&text);
        assert!(findings.iter().any(|f| f.message.contains("title")));
    }

    #[test]
    fn unknown_category_label() {
        let text = ENTRY.replacen("Core Commands", "Misc", 1);
        let findings = entry_findings(&text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("unknown category `Misc`"));
    }

    #[test]
    fn too_few_example_prompts() {
        let text = ENTRY.replacen("- `analyze this query plan`\n", "", 1);
        let findings = entry_findings(&text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("at least 2 example prompts, found 1"));
    }

    #[test]
    fn blank_inline_code_in_prompts() {
        let text = ENTRY.replacen("`analyze this query plan`", "` `", 1);
        let findings = entry_findings(&text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("empty inline code"));
        assert_eq!(findings[0].line, Some(10));
    }

    #[test]
    fn brief_output_format() {
        let text = "# Short\n\n**Category**: Core Commands\n\n**Definition**: Tiny.\n\n## Example Prompts\n\n- `a`\n- `b`\n\n## Expected Output Format\n\n```\nok\n```\n";
        let findings = entry_findings(text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("too brief"));
    }

    #[test]
    fn output_format_length_boundary() {
        let block = "## Summary\nA short overview of the findings, ranked by impact.";
        let at_min = ENTRY.replacen(block, &"x".repeat(50), 1);
        assert_eq!(entry_findings(&at_min), vec![]);

        let below = ENTRY.replacen(block, &"x".repeat(49), 1);
        let findings = entry_findings(&below);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("(49 chars, need 50)"));
    }

    #[test]
    fn output_format_without_code_block() {
        let text = "# Short\n\n**Category**: Core Commands\n\n**Definition**: Tiny.\n\n## Example Prompts\n\n- `a`\n- `b`\n\n## Expected Output Format\n\nA numbered list of findings, each with a severity, a location and a fix.\n";
        let findings = entry_findings(text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("fenced code block"));
    }

    #[test]
    fn empty_code_block_warns() {
        let text = format!("{}\n```bash\n\n```\n", ENTRY);
        let findings = entry_findings(&text);
        assert_eq!(findings.len(), 1);
        assert!(!findings[0].is_error());
        assert_eq!(findings[0].message, "empty code block");
    }

    #[test]
    fn auxiliary_documents_are_not_checked() {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        let doc = parse_document("README.md", DocumentKind::Auxiliary, "no title\n```\n```\n");
        assert!(check(&doc, &ctx).is_empty());
    }
}
