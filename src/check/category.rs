//! Category consistency: an entry's declared category must match the
//! category directory it lives in.

use super::Context;
use crate::model::{Document, DocumentKind, Finding, FindingKind};

/// Category directory of an entry path, i.e. the first segment below the
/// dictionary root. `None` for files directly in the root.
pub fn category_dir<'p>(path: &'p str, dictionary_prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(dictionary_prefix)?;
    let (dir, _) = rest.split_once('/')?;
    Some(dir)
}

/// Mismatched labels are only a warning; a missing category directory is an
/// error since every entry must belong to exactly one category.
pub fn check(doc: &Document, ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    if doc.kind != DocumentKind::Entry {
        return findings;
    }

    let prefix = ctx.config.dictionary_prefix();
    let expected = category_dir(&doc.path, &prefix)
        .and_then(|dir| ctx.config.categories.get(dir).map(|label| (dir, label)));

    let Some((dir, label)) = expected else {
        findings.push(
            Finding::error(
                FindingKind::Structural,
                format!(
                    "entry is not inside a recognized category directory of {}",
                    ctx.config.dictionary
                ),
            )
            .at(&doc.path),
        );
        return findings;
    };

    // Missing labels are reported by the schema check.
    if let Some(declared) = doc.category.as_deref().map(str::trim) {
        if !declared.is_empty() && declared != label {
            findings.push(
                Finding::warning(format!(
                    "category mismatch: declared `{}` but directory `{}` is `{}`",
                    declared, dir, label
                ))
                .at(&doc.path),
            );
        }
    }

    findings
}

/// The dictionary must hold entries, and every category should have one.
pub fn check_coverage(docs: &[Document], ctx: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    let prefix = ctx.config.dictionary_prefix();
    let entries: Vec<&Document> = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Entry)
        .collect();

    if entries.is_empty() {
        findings.push(Finding::error(
            FindingKind::Structural,
            format!("no command entries found under {}", prefix),
        ));
        return findings;
    }

    for dir in ctx.config.categories.keys() {
        let populated = entries
            .iter()
            .any(|d| category_dir(&d.path, &prefix) == Some(dir.as_str()));
        if !populated {
            findings.push(Finding::warning(format!(
                "category directory {}{} has no command entries",
                prefix, dir
            )));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testutil::{context, ENTRY, INDEX};
    use crate::parser::parse_document;

    fn findings_for(path: &str, text: &str) -> Vec<Finding> {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        let doc = parse_document(path, DocumentKind::Entry, text);
        check(&doc, &ctx)
    }

    #[test]
    fn category_dir_is_first_segment() {
        assert_eq!(
            category_dir("dictionary/core/analyze-this.md", "dictionary/"),
            Some("core")
        );
        assert_eq!(
            category_dir("dictionary/git/sub/gh-pr.md", "dictionary/"),
            Some("git")
        );
        assert_eq!(category_dir("dictionary/loose.md", "dictionary/"), None);
        assert_eq!(category_dir("README.md", "dictionary/"), None);
    }

    #[test]
    fn matching_category_is_clean() {
        assert!(findings_for("dictionary/core/analyze-this.md", ENTRY).is_empty());
    }

    #[test]
    fn mismatch_is_warning() {
        let findings = findings_for("dictionary/workflow/analyze-this.md", ENTRY);
        assert_eq!(findings.len(), 1);
        assert!(!findings[0].is_error());
        assert!(findings[0].message.contains("category mismatch"));
        assert!(findings[0].message.contains("Workflow Commands"));
    }

    #[test]
    fn unknown_directory_is_error() {
        let findings = findings_for("dictionary/misc/analyze-this.md", ENTRY);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_error());
        let findings = findings_for("dictionary/analyze-this.md", ENTRY);
        assert!(findings[0].is_error());
    }

    #[test]
    fn declared_label_is_trimmed() {
        let text = ENTRY.replacen("Core Commands", "Core Commands   ", 1);
        assert!(findings_for("dictionary/core/analyze-this.md", &text).is_empty());
    }

    #[test]
    fn coverage_reports_empty_categories() {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        let docs = vec![
            index.clone(),
            parse_document("dictionary/core/analyze-this.md", DocumentKind::Entry, ENTRY),
        ];
        let findings = check_coverage(&docs, &ctx);
        assert_eq!(findings.len(), 5);
        assert!(findings.iter().all(|f| !f.is_error()));
    }

    #[test]
    fn coverage_without_entries_is_error() {
        let index = parse_document("information-dense-keywords.md", DocumentKind::Index, INDEX);
        let ctx = context(&index);
        let findings = check_coverage(&[index.clone()], &ctx);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_error());
    }
}
