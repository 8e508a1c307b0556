//! Request URL assembly.
//!
//! A request URL is the endpoint path, an optional percent-encoded target,
//! the schema-ordered query parameters, and finally the signed auth
//! parameters:
//!
//! ```text
//! http://lsapi.seomoz.com/linkscape/url-metrics/moz.com%2Fblog?Cols=68719476737&Limit=35&AccessID=..&Expires=..&Signature=..
//! ```

use serde_json::Value;

use crate::columns;
use crate::error::{LinkscapeError, Result};
use crate::params::Params;
use crate::schema::{EndpointKind, EndpointSchema};
use crate::signer::Signer;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://lsapi.seomoz.com/linkscape/";

/// Capitalize the first letter of each word and lowercase the rest.
///
/// ```
/// use linkscape::url_builder::to_title_case;
///
/// assert_eq!(to_title_case("hello world"), "Hello World");
/// assert_eq!(to_title_case("seoRocksTheWorld"), "Seorockstheworld");
/// ```
pub fn to_title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Wire name for a camelCase parameter: `targetCols` → `TargetCols`.
pub fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Percent-encode a target for use as a path segment.
///
/// Reserved characters (`/`, `:`, `?`, `&`, ...) are encoded too.
pub fn encode_target(target: Option<&str>) -> String {
    target
        .map(|t| urlencoding::encode(t).into_owned())
        .unwrap_or_default()
}

/// Render one `Name=value&` fragment.
pub fn append_param(name: &str, value: &str, trailing_ampersand: bool) -> String {
    let sep = if trailing_ampersand { "&" } else { "" };
    format!("{}={}{}", pascal_case(name), value, sep)
}

/// Render a parameter value: lists are `+`-joined, scalars pass through.
pub fn filter_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(filter_value)
            .collect::<Vec<_>>()
            .join("+"),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the query parameters in schema order.
///
/// Missing parameters fall back to their schema default, if any. Column
/// lists are converted to bitmasks. Keys the schema does not know are
/// skipped here; rejecting them, and reporting deprecated columns, is the
/// validator's job.
pub fn serialize_params(schema: &EndpointSchema, params: &Params) -> Result<String> {
    let mut query = String::new();

    for spec in schema.params {
        let value = match params.get(spec.name).filter(|v| !v.is_null()) {
            Some(v) => v.clone(),
            None => match spec.default {
                Some(d) => Value::String(d.to_string()),
                None => continue,
            },
        };

        let rendered = match (schema.bit_flag_mapping(spec.name), &value) {
            (Some(kind), Value::Array(items)) => {
                let labels = items
                    .iter()
                    .map(|v| {
                        v.as_str().ok_or_else(|| LinkscapeError::WrongDatatype {
                            field: spec.name.to_string(),
                        })
                    })
                    .collect::<Result<Vec<&str>>>()?;
                columns::build_col(labels.as_slice(), kind)?.to_string()
            }
            _ => filter_value(&value),
        };

        query.push_str(&append_param(spec.name, &rendered, true));
    }

    Ok(query)
}

/// The `AccessID`, `Expires`, `Signature` triple.
pub fn signed_query(access_id: &str, expires: i64, signature: &str) -> String {
    [
        append_param("AccessID", access_id, true),
        append_param("Expires", &expires.to_string(), true),
        append_param("Signature", &urlencoding::encode(signature), false),
    ]
    .concat()
}

/// Builds URLs for one endpoint kind.
#[derive(Debug, Clone)]
pub struct UrlBuilder<'a> {
    base_url: &'a str,
    kind: EndpointKind,
}

impl<'a> UrlBuilder<'a> {
    /// Create a builder. `base_url` must end with `/`.
    pub fn new(base_url: &'a str, kind: EndpointKind) -> Self {
        Self { base_url, kind }
    }

    /// Builder against [`DEFAULT_BASE_URL`].
    pub fn default_base(kind: EndpointKind) -> UrlBuilder<'static> {
        UrlBuilder::new(DEFAULT_BASE_URL, kind)
    }

    /// `{base}{kind}/`.
    pub fn endpoint_path(&self) -> String {
        format!("{}{}/", self.base_url, self.kind)
    }

    /// The signed auth parameters from the signer's cached state.
    ///
    /// Generates a signature first if the signer has none yet.
    pub fn signed_query(&self, signer: &mut Signer) -> String {
        let signature = match signer.signature() {
            Some(s) => s.to_string(),
            None => signer.generate(),
        };
        let expires = signer.expires_at().unwrap_or_else(|| signer.expires(None));
        signed_query(signer.access_id(), expires, &signature)
    }

    /// Assemble the full URL.
    ///
    /// The signature is regenerated immediately before assembly so that
    /// long-lived clients never send an expired one.
    pub fn build_url(
        &self,
        params: &Params,
        target: Option<&str>,
        signer: &mut Signer,
    ) -> Result<String> {
        let query = serialize_params(self.kind.schema(), params)?;
        signer.generate();

        let url = format!(
            "{}{}?{}{}",
            self.endpoint_path(),
            encode_target(target),
            query,
            self.signed_query(signer)
        );

        tracing::debug!(endpoint = %self.kind, request_target = target.unwrap_or(""), "built request url");
        Ok(url)
    }
}
