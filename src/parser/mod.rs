//! Parser module — turns raw document text into a [`Document`] record.

pub mod markdown;

use crate::model::{Document, DocumentKind};
use tracing::debug;

/// Extract the structured record for one document.
pub fn parse_document(path: &str, kind: DocumentKind, content: &str) -> Document {
    let doc = markdown::parse(path, kind, content);
    debug!(
        path,
        ?kind,
        sections = doc.sections.len(),
        links = doc.links.len(),
        code_blocks = doc.code_blocks.len(),
        "extracted document"
    );
    doc
}
