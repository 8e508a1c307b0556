//! Human-readable descriptions of endpoint and response codes.
//!
//! Responses use terse field names (`upa`, `pda`, `lf`, ...). [`explain`]
//! turns one into its label and [`humanize`] rewrites a whole response.

use serde_json::{Map, Value};

use crate::columns::{self, ColumnKind};

/// Returned for codes with no known description.
pub const NO_EXPLANATION: &str = "No explanation";

static EXPLAIN: &[(&str, &str)] = &[
    ("url-metrics", "Metrics about one or more URLs"),
    ("links", "Links pointing at a page, subdomain or root domain"),
    ("anchor-text", "Anchor text used in links to a page, subdomain or root domain"),
    ("top-pages", "Pages on a subdomain with the most links"),
    ("metadata", "Information about the current and upcoming index"),
    ("umrr", "MozRank: URL (raw)"),
    ("fmrr", "MozRank: Subdomain (raw)"),
    ("pmrr", "MozRank: Root Domain (raw)"),
    ("utrr", "MozTrust (raw)"),
    ("ftrr", "MozTrust: Subdomain (raw)"),
    ("ptrr", "MozTrust: Root Domain (raw)"),
    ("uemrr", "MozRank: External Equity (raw)"),
    ("fejr", "MozRank: Subdomain, External Equity (raw)"),
    ("pejr", "MozRank: Root Domain, External Equity (raw)"),
    ("lmrr", "MozRank Passed (raw)"),
    ("lrid", "Link ID"),
    ("lsrc", "Source URL ID"),
    ("ltgt", "Target URL ID"),
];

/// Describe an endpoint or response code.
pub fn explain(code: &str) -> &'static str {
    EXPLAIN
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
        .or_else(|| columns::by_code(code).map(|f| f.label))
        .unwrap_or(NO_EXPLANATION)
}

/// Rewrite response field names to their labels.
///
/// Objects are processed recursively (including inside arrays). A numeric
/// link-flags field (`lf`) is decoded into the list of flag labels. Fields
/// with no known description are kept as is.
pub fn humanize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(humanize).collect()),
        Value::Object(fields) => {
            let mut out = Map::new();
            for (key, field) in fields {
                let label = match explain(key) {
                    NO_EXPLANATION => key.clone(),
                    label => label.to_string(),
                };
                let field = match (key.as_str(), field.as_u64()) {
                    ("lf", Some(bits)) => Value::from(columns::decode(ColumnKind::LinkFlags, bits)),
                    _ => humanize(field),
                };
                out.insert(label, field);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_explain_known_codes() {
        assert_eq!(explain("pda"), "Domain Authority");
        assert_eq!(explain("umrr"), "MozRank: URL (raw)");
        assert_eq!(explain("links"), "Links pointing at a page, subdomain or root domain");
    }

    #[test]
    fn test_explain_unknown_code() {
        assert_eq!(explain("xyz"), "No explanation");
        assert_eq!(explain(""), NO_EXPLANATION);
    }

    #[test]
    fn test_humanize_metrics_object() {
        let response = json!({"ut": "Moz", "upa": 71.2, "custom": 1});
        let human = humanize(&response);
        assert_eq!(human["Title"], json!("Moz"));
        assert_eq!(human["Page Authority"], json!(71.2));
        assert_eq!(human["custom"], json!(1));
    }

    #[test]
    fn test_humanize_decodes_link_flags() {
        let response = json!([{"lf": 65, "lt": "click here"}]);
        let human = humanize(&response);
        assert_eq!(human[0]["Flags"], json!(["No Follow", "301"]));
        assert_eq!(human[0]["Anchor Text"], json!("click here"));
    }
}
