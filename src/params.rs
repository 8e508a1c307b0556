//! Caller-supplied request parameters and targets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for one request, keyed by camelCase name.
///
/// Values are loosely typed (strings, numbers, or lists of strings) and are
/// checked against the endpoint schema before a URL is built.
///
/// # Example
///
/// ```
/// use linkscape::Params;
///
/// let params = Params::new()
///     .cols(["Title", "Domain Authority"])
///     .with("limit", 35);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set the `cols` column list.
    #[must_use]
    pub fn cols<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_list("cols", labels)
    }

    /// Set any list-valued parameter.
    #[must_use]
    pub fn with_list<I, S>(self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<Value> = items.into_iter().map(|s| Value::String(s.into())).collect();
        self.with(name, Value::Array(items))
    }

    /// Set a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Iterate over parameter names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The target(s) of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Targets {
    /// No target; the URL has no target segment.
    #[default]
    None,
    /// A single target.
    One(String),
    /// Several targets; `get` sends one request each.
    Many(Vec<String>),
}

impl Targets {
    /// The targets as a list (empty for `None`).
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(t) => vec![t.clone()],
            Self::Many(ts) => ts.clone(),
        }
    }

    /// Returns true if there is no target.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<&str> for Targets {
    fn from(t: &str) -> Self {
        Self::One(t.to_string())
    }
}

impl From<String> for Targets {
    fn from(t: String) -> Self {
        Self::One(t)
    }
}

impl From<Vec<String>> for Targets {
    fn from(ts: Vec<String>) -> Self {
        Self::Many(ts)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(ts: Vec<&str>) -> Self {
        Self::Many(ts.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(ts: [&str; N]) -> Self {
        Self::Many(ts.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Targets>> From<Option<T>> for Targets {
    fn from(t: Option<T>) -> Self {
        t.map_or(Self::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_params_builder() {
        let params = Params::new()
            .cols(["Title", "Links"])
            .with("limit", 35)
            .with("scope", "page_to_page");

        assert_eq!(params.get("cols"), Some(&json!(["Title", "Links"])));
        assert_eq!(params.get("limit"), Some(&json!(35)));
        assert_eq!(params.len(), 3);
        assert!(params.get("sort").is_none());
    }

    #[test]
    fn test_params_deserialize_from_json_object() {
        let params: Params =
            serde_json::from_value(json!({"cols": ["Title"], "limit": 10})).unwrap();
        assert_eq!(params.len(), 2);
        assert!(params.keys().any(|k| k == "limit"));
    }

    #[test]
    fn test_targets_conversions() {
        assert_eq!(Targets::from("moz.com"), Targets::One("moz.com".to_string()));
        assert_eq!(
            Targets::from(["a.com", "b.com"]).to_vec(),
            vec!["a.com".to_string(), "b.com".to_string()]
        );
        assert!(Targets::from(None::<&str>).is_none());
        assert!(Targets::None.to_vec().is_empty());
    }
}
