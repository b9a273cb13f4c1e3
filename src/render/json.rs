//! JSON renderer — structured output for CI tooling.

use crate::error::Result;
use crate::model::{Finding, Report};
use crate::render::Renderer;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    documents: usize,
    links: usize,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
}

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report) -> Result<String> {
        let view = JsonReport {
            passed: report.passed(),
            documents: report.documents,
            links: report.links,
            errors: report.error_count(),
            warnings: report.warning_count(),
            findings: &report.findings,
        };
        let mut out = serde_json::to_string_pretty(&view)?;
        out.push('\n');
        Ok(out)
    }
}
