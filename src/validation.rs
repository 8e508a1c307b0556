//! Parameter validation.
//!
//! Each validator is a pure check that returns [`Validity::Valid`] on
//! success, [`Validity::Absent`] when there is nothing to check (the value
//! is missing or `null`), or an error naming the offending field or value.
//! Column checks that pass on deprecated labels return
//! [`Validity::Deprecated`] with the warnings instead of logging them.
//! [`validate_params`] composes them for a whole request.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::columns::{self, ColumnKind};
use crate::error::{LinkscapeError, Result};
use crate::params::{Params, Targets};
use crate::schema::{EndpointSchema, ParamType, ScopeMapping};

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The value was present and passed.
    Valid,
    /// The value passed, but names deprecated columns.
    Deprecated(Vec<String>),
    /// There was no value; nothing was checked.
    Absent,
}

impl Validity {
    /// Returns true when a value was present and passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::Deprecated(_))
    }

    /// Deprecation warnings raised by the check.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Deprecated(warnings) => warnings,
            _ => &[],
        }
    }

    fn with_warnings(warnings: Vec<String>) -> Self {
        if warnings.is_empty() {
            Self::Valid
        } else {
            Self::Deprecated(warnings)
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i)^([a-z][a-z0-9+.\-]*://)?([a-z0-9\-]+\.)+[a-z]{2,}(:\d+)?([/?#]\S*)?$")
                .ok()
        })
        .as_ref()
}

/// Whether a string looks like `[scheme://]host.tld[/path]`.
pub fn is_url(s: &str) -> bool {
    url_pattern().is_some_and(|re| re.is_match(s))
}

/// Check a single URL.
pub fn validate_url(value: Option<&Value>) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    let s = value.as_str().ok_or_else(|| LinkscapeError::InvalidDatatype {
        field: format!("url {value}"),
    })?;
    if !is_url(s) {
        return Err(LinkscapeError::InvalidUrl(s.to_string()));
    }
    Ok(Validity::Valid)
}

/// Check a list of URLs, failing on the first bad one.
///
/// Anything other than a list is a datatype error, even a valid-looking
/// single URL string.
pub fn validate_urls(value: Option<&Value>) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    let urls = value.as_array().ok_or_else(|| LinkscapeError::InvalidDatatype {
        field: "urls".to_string(),
    })?;
    for url in urls {
        validate_url(Some(url))?;
    }
    Ok(Validity::Valid)
}

/// Check that a value is a finite number.
pub fn validate_numeric(value: Option<&Value>, field: &str) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(Validity::Valid),
        _ => Err(LinkscapeError::InvalidDatatype {
            field: field.to_string(),
        }),
    }
}

/// Check that a value is a string. The empty string passes.
pub fn validate_string(value: Option<&Value>, field: &str) -> Result<Validity> {
    match present(value) {
        None => Ok(Validity::Absent),
        Some(Value::String(_)) => Ok(Validity::Valid),
        Some(_) => Err(LinkscapeError::InvalidDatatype {
            field: field.to_string(),
        }),
    }
}

/// Check a sort field against the fields allowed for a scope.
///
/// A scope that has no entry in the mapping is accepted as is.
pub fn validate_mapping(
    mapping: &ScopeMapping,
    scope: Option<&str>,
    field: Option<&str>,
) -> Result<Validity> {
    let (Some(scope), Some(field)) = (scope, field) else {
        return Ok(Validity::Absent);
    };
    let Some((_, allowed)) = mapping.iter().find(|(s, _)| *s == scope) else {
        return Ok(Validity::Absent);
    };
    if allowed.contains(&field) {
        Ok(Validity::Valid)
    } else {
        Err(LinkscapeError::InvalidMapping {
            scope: scope.to_string(),
            field: field.to_string(),
        })
    }
}

/// [`validate_mapping`] over several scopes, stopping at the first failure.
pub fn validate_mappings(
    mapping: &ScopeMapping,
    scopes: &[&str],
    field: Option<&str>,
) -> Result<Validity> {
    let mut result = Validity::Absent;
    for scope in scopes {
        if validate_mapping(mapping, Some(scope), field)?.is_valid() {
            result = Validity::Valid;
        }
    }
    Ok(result)
}

/// Check that every label in a column list exists in the registry.
///
/// Deprecated labels pass and come back as [`Validity::Deprecated`].
pub fn validate_columns(value: Option<&Value>, kind: ColumnKind, field: &str) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    let wrong_type = || LinkscapeError::WrongDatatype {
        field: field.to_string(),
    };
    let labels = value.as_array().ok_or_else(wrong_type)?;
    let mut warnings = Vec::new();
    for label in labels {
        let label = label.as_str().ok_or_else(wrong_type)?;
        let (_, warning) = columns::bit_position(kind, label)?;
        warnings.extend(warning);
    }
    Ok(Validity::with_warnings(warnings))
}

/// Check that a scalar value is one of `reference`.
pub fn validate_field_in_array(
    value: Option<&Value>,
    reference: Option<&[&str]>,
    label: &str,
) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            return Err(LinkscapeError::IncorrectDatatype {
                label: label.to_string(),
            })
        }
    };
    let reference = reference.ok_or_else(|| LinkscapeError::MissingReference {
        label: label.to_string(),
    })?;
    if reference.contains(&text.as_str()) {
        Ok(Validity::Valid)
    } else {
        Err(LinkscapeError::NotFound {
            value: text,
            label: label.to_string(),
        })
    }
}

/// Check that a value is present.
pub fn validate_present(value: Option<&Value>, label: &str) -> Result<Validity> {
    present(value)
        .map(|_| Validity::Valid)
        .ok_or_else(|| LinkscapeError::NotPresent(label.to_string()))
}

/// Check that every key is accepted by the endpoint.
pub fn validate_recognized(params: &Params, schema: &EndpointSchema) -> Result<Validity> {
    match params.keys().find(|k| !schema.accepts(k)) {
        Some(key) => Err(LinkscapeError::UnrecognizedParameter(key.to_string())),
        None => Ok(Validity::Valid),
    }
}

fn validate_filter(value: Option<&Value>, schema: &EndpointSchema, field: &str) -> Result<Validity> {
    let Some(value) = present(value) else {
        return Ok(Validity::Absent);
    };
    let names: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        Value::String(s) => s.split('+').map(|p| Value::String(p.to_string())).collect(),
        _ => {
            return Err(LinkscapeError::InvalidDatatype {
                field: field.to_string(),
            })
        }
    };
    for name in &names {
        validate_field_in_array(Some(name), Some(schema.filters), field)?;
    }
    Ok(Validity::Valid)
}

/// Validate a full parameter set against an endpoint schema.
///
/// Unknown keys are rejected first, then each accepted parameter is
/// checked by type, and finally the sort field is checked against the
/// scope (falling back to the schema defaults for either). Deprecation
/// warnings from every column list are collected into the result.
pub fn validate_params(params: &Params, schema: &EndpointSchema) -> Result<Validity> {
    validate_recognized(params, schema)?;

    let mut warnings = Vec::new();
    for spec in schema.params {
        let value = params.get(spec.name);
        match spec.ty {
            ParamType::Columns(kind) => {
                let checked = validate_columns(value, kind, spec.name)?;
                warnings.extend_from_slice(checked.warnings());
                checked
            }
            ParamType::Number => validate_numeric(value, spec.name)?,
            ParamType::Scope => {
                validate_string(value, spec.name)?;
                validate_field_in_array(value, Some(schema.scopes), spec.name)?
            }
            ParamType::Sort => validate_string(value, spec.name)?,
            ParamType::Filter => validate_filter(value, schema, spec.name)?,
        };
    }

    let effective = |name: &str| -> Option<String> {
        match present(params.get(name)) {
            Some(v) => v.as_str().map(str::to_string),
            None => schema.param(name).and_then(|p| p.default).map(str::to_string),
        }
    };
    let scope = effective("scope");
    let sort = effective("sort");
    validate_mapping(schema.mappings, scope.as_deref(), sort.as_deref())?;

    Ok(Validity::with_warnings(warnings))
}

/// Validate request targets for an endpoint.
///
/// URL endpoints need URL-shaped targets; endpoints with fixed target
/// names need one of those names.
pub fn validate_targets(targets: &Targets, schema: &EndpointSchema) -> Result<Validity> {
    let list = targets.to_vec();
    if list.is_empty() {
        return validate_present(None, "target");
    }
    match schema.targets {
        None => validate_urls(Some(&Value::from(list))),
        Some(names) => {
            for target in list {
                validate_field_in_array(Some(&Value::String(target)), Some(names), "target")?;
            }
            Ok(Validity::Valid)
        }
    }
}
