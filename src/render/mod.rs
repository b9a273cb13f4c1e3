//! Renderer module — trait-based report format dispatch.

pub mod json;
pub mod text;

use crate::error::{Error, Result};
use crate::model::Report;

/// Trait for rendering a validation report into a specific output format.
pub trait Renderer {
    fn render(&self, report: &Report) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "text" | "human" => Ok(Box::new(text::TextRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}
