//! Human-readable report: errors first, then warnings, then a summary line.

use crate::error::Result;
use crate::model::{Finding, FindingKind, Report};
use crate::render::Renderer;

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let mut out = String::new();

        let errors: Vec<&Finding> = report.errors().collect();
        let warnings: Vec<&Finding> = report.warnings().collect();

        if !errors.is_empty() {
            out.push_str(&format!("{} error(s):\n", errors.len()));
            for f in &errors {
                out.push_str(&format!("  error[{}] {}\n", kind_label(f.kind), f));
            }
        }

        if !warnings.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("{} warning(s):\n", warnings.len()));
            for f in &warnings {
                out.push_str(&format!("  warning {}\n", f));
            }
        }

        if errors.is_empty() && warnings.is_empty() {
            out.push_str("All validations passed.\n");
        }

        out.push_str(&format!(
            "\nSummary: {} documents, {} links, {} errors, {} warnings\n",
            report.documents,
            report.links,
            errors.len(),
            warnings.len()
        ));
        Ok(out)
    }
}

fn kind_label(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::Structural => "structure",
        FindingKind::Reference => "reference",
        FindingKind::Grammar => "grammar",
        FindingKind::Advisory => "advisory",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report() {
        let out = TextRenderer.render(&Report::default()).unwrap();
        assert_eq!(
            out,
            "All validations passed.\n\nSummary: 0 documents, 0 links, 0 errors, 0 warnings\n"
        );
    }

    #[test]
    fn errors_before_warnings() {
        let report = Report {
            documents: 2,
            links: 3,
            findings: vec![
                Finding::warning("link text varies"),
                Finding::error(FindingKind::Reference, "broken link to x.md")
                    .at("information-dense-keywords.md")
                    .line(4),
            ],
        };
        let out = TextRenderer.render(&report).unwrap();
        assert_eq!(
            out,
            "1 error(s):\n  error[reference] information-dense-keywords.md:4: broken link to x.md\n\n1 warning(s):\n  warning link text varies\n\nSummary: 2 documents, 3 links, 1 errors, 1 warnings\n"
        );
    }
}
