//! Label generators: turn annotated mind maps into JSONL training examples.

pub mod parse;
pub mod pos;
pub mod structured;

/// Renders a list answer as a bracketed, quoted listing.
pub(crate) fn render_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "None".to_string())
}
