//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use serde_json::Value;

use crate::explain::humanize;
use crate::schema::EndpointKind;
use crate::url_builder::to_title_case;

/// Trait for human-readable key-value output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// A response from one endpoint for one target.
#[derive(Debug, Clone)]
pub struct EndpointResponse<'a> {
    /// The endpoint the response came from.
    pub kind: EndpointKind,
    /// The target that was requested.
    pub target: &'a str,
    /// The decoded response body.
    pub body: &'a Value,
}

impl PrettyPrint for EndpointResponse<'_> {
    fn pretty_print(&self) -> String {
        let header = format!(
            "{}: {}",
            to_title_case(&self.kind.as_str().replace('-', " ")),
            self.target
        );
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider];
        match humanize(self.body) {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.extend(field_lines(item));
                }
            }
            other => lines.extend(field_lines(&other)),
        }
        lines.join("\n")
    }
}

fn field_lines(value: &Value) -> Vec<String> {
    let Value::Object(fields) = value else {
        return vec![scalar(value)];
    };
    let width = fields.keys().map(|k| k.chars().count()).max().unwrap_or(0) + 1;
    fields
        .iter()
        .map(|(k, v)| format!("{:<width$} {}", format!("{k}:"), scalar(v), width = width))
        .collect()
}

/// Render a value without JSON quoting.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
