//! Rich-text body extraction over loosely typed attribute sets.
use serde_json::Value;

use super::model::Attributes;

/// Conventional alternates probed after `body`, in priority order.
pub const CANDIDATE_FIELDS: [&str; 4] = [
    "field_body",
    "field_content",
    "field_text",
    "field_description",
];

/// The attribute shapes the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape<'a> {
    /// `{value, processed}` text field; either half may be missing or non-string.
    RichText {
        processed: Option<&'a str>,
        value: Option<&'a str>,
    },
    Text(&'a str),
    Other,
}

impl<'a> FieldShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(obj) if obj.contains_key("processed") || obj.contains_key("value") => {
                FieldShape::RichText {
                    processed: obj.get("processed").and_then(Value::as_str),
                    value: obj.get("value").and_then(Value::as_str),
                }
            }
            Value::String(s) => FieldShape::Text(s),
            _ => FieldShape::Other,
        }
    }

    /// Rendered value first, raw value second; empty strings do not count.
    fn non_empty_html(self) -> Option<&'a str> {
        match self {
            FieldShape::RichText { processed, value } => processed
                .filter(|s| !s.is_empty())
                .or(value.filter(|s| !s.is_empty())),
            _ => None,
        }
    }

    /// Any string half, rendered first. Used by the last-resort scan.
    fn any_html(self) -> Option<&'a str> {
        match self {
            FieldShape::RichText { processed, value } => processed.or(value),
            _ => None,
        }
    }
}

fn named_html<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs.get(name).map(FieldShape::classify)?.non_empty_html()
}

/// Locate the HTML body of a resource.
///
/// `body` wins, then [`CANDIDATE_FIELDS`], then the first attribute in document order
/// shaped like a text field. `None` means there is nothing to render.
pub fn extract_html(attrs: &Attributes) -> Option<String> {
    if let Some(html) = named_html(attrs, "body") {
        return Some(html.to_string());
    }
    for name in CANDIDATE_FIELDS {
        if let Some(html) = named_html(attrs, name) {
            return Some(html.to_string());
        }
    }
    // NOTE: schema sniffing; a metadata field shaped like {value: ..} would be picked up here.
    attrs
        .values()
        .find_map(|v| FieldShape::classify(v).any_html())
        .map(str::to_string)
}
