//! Per-endpoint parameter schemas.
//!
//! Each endpoint kind has one static [`EndpointSchema`] describing the
//! parameters it accepts (in wire order), which of them are column lists,
//! and which scope/sort/filter values the API allows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::columns::ColumnKind;
use crate::error::{LinkscapeError, Result};

/// The remote resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointKind {
    /// Metrics about one or more URLs.
    UrlMetrics,
    /// Links pointing at a URL.
    Links,
    /// Anchor text used in links to a URL.
    AnchorText,
    /// The strongest pages on a domain.
    TopPages,
    /// Index update information.
    Metadata,
}

impl EndpointKind {
    /// Every endpoint kind.
    pub const ALL: [EndpointKind; 5] = [
        Self::UrlMetrics,
        Self::Links,
        Self::AnchorText,
        Self::TopPages,
        Self::Metadata,
    ];

    /// The path segment for this endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlMetrics => "url-metrics",
            Self::Links => "links",
            Self::AnchorText => "anchor-text",
            Self::TopPages => "top-pages",
            Self::Metadata => "metadata",
        }
    }

    /// The schema for this endpoint.
    pub fn schema(&self) -> &'static EndpointSchema {
        match self {
            Self::UrlMetrics => &URL_METRICS,
            Self::Links => &LINKS,
            Self::AnchorText => &ANCHOR_TEXT,
            Self::TopPages => &TOP_PAGES,
            Self::Metadata => &METADATA,
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = LinkscapeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LinkscapeError::NotFound {
                value: s.to_string(),
                label: "endpoint kinds".to_string(),
            })
    }
}

/// How a parameter value is checked and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// A list of column labels, sent as a bitmask.
    Columns(ColumnKind),
    /// A finite number.
    Number,
    /// The link scope.
    Scope,
    /// The sort field, constrained by the scope.
    Sort,
    /// One or more filter names, sent `+`-joined.
    Filter,
}

/// One accepted parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// camelCase name used by callers.
    pub name: &'static str,
    /// Value sent when the caller leaves it out.
    pub default: Option<&'static str>,
    /// Type of the parameter.
    pub ty: ParamType,
}

const fn param(name: &'static str, ty: ParamType) -> ParamSpec {
    ParamSpec {
        name,
        default: None,
        ty,
    }
}

const fn param_or(name: &'static str, default: &'static str, ty: ParamType) -> ParamSpec {
    ParamSpec {
        name,
        default: Some(default),
        ty,
    }
}

/// Scope → allowed sort fields.
pub type ScopeMapping = [(&'static str, &'static [&'static str])];

/// Static description of one endpoint.
#[derive(Debug)]
pub struct EndpointSchema {
    /// The endpoint this schema belongs to.
    pub kind: EndpointKind,
    /// Accepted parameters in wire order.
    pub params: &'static [ParamSpec],
    /// Allowed values for `scope`.
    pub scopes: &'static [&'static str],
    /// Allowed sort fields per scope.
    pub mappings: &'static ScopeMapping,
    /// Allowed filter names.
    pub filters: &'static [&'static str],
    /// Fixed target names, for endpoints whose target is not a URL.
    pub targets: Option<&'static [&'static str]>,
}

impl EndpointSchema {
    /// Look up an accepted parameter by name.
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether `name` is an accepted parameter.
    pub fn accepts(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// The column registry used by a column-list parameter.
    pub fn bit_flag_mapping(&self, name: &str) -> Option<ColumnKind> {
        match self.param(name)?.ty {
            ParamType::Columns(kind) => Some(kind),
            _ => None,
        }
    }

    /// Deprecated column labels across every column parameter.
    pub fn deprecated_flags(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for p in self.params {
            if let ParamType::Columns(kind) = p.ty {
                for label in kind.deprecated_labels() {
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
            }
        }
        labels
    }

    /// Whether targets are URLs (as opposed to fixed names).
    pub fn targets_are_urls(&self) -> bool {
        self.targets.is_none()
    }
}

const SORT_PA_DA: &[&str] = &["page_authority", "domain_authority"];
const SORT_PAGE: &[&str] = &["page_authority", "domain_authority", "domains_linking_page"];
const SORT_DOMAIN: &[&str] = &[
    "page_authority",
    "domain_authority",
    "domains_linking_page",
    "domains_linking_domain",
];
const SORT_DOMAIN_ONLY: &[&str] = &["page_authority", "domain_authority", "domains_linking_domain"];
const SORT_ANCHOR: &[&str] = &["domains_linking_page"];

static URL_METRICS: EndpointSchema = EndpointSchema {
    kind: EndpointKind::UrlMetrics,
    params: &[
        param("cols", ParamType::Columns(ColumnKind::UrlMetrics)),
        param("limit", ParamType::Number),
    ],
    scopes: &[],
    mappings: &[],
    filters: &[],
    targets: None,
};

static LINKS: EndpointSchema = EndpointSchema {
    kind: EndpointKind::Links,
    params: &[
        param_or("scope", "page_to_page", ParamType::Scope),
        param_or("sort", "page_authority", ParamType::Sort),
        param("filter", ParamType::Filter),
        param("targetCols", ParamType::Columns(ColumnKind::UrlMetrics)),
        param("sourceCols", ParamType::Columns(ColumnKind::UrlMetrics)),
        param("linkCols", ParamType::Columns(ColumnKind::Links)),
        param("offset", ParamType::Number),
        param("limit", ParamType::Number),
    ],
    scopes: &[
        "page_to_page",
        "page_to_subdomain",
        "page_to_domain",
        "domain_to_page",
        "domain_to_subdomain",
        "domain_to_domain",
    ],
    mappings: &[
        ("page_to_page", SORT_PA_DA),
        ("page_to_subdomain", SORT_PAGE),
        ("page_to_domain", SORT_DOMAIN),
        ("domain_to_page", SORT_PA_DA),
        ("domain_to_subdomain", SORT_PAGE),
        ("domain_to_domain", SORT_DOMAIN_ONLY),
    ],
    filters: &["internal", "external", "nofollow", "follow", "301", "302"],
    targets: None,
};

static ANCHOR_TEXT: EndpointSchema = EndpointSchema {
    kind: EndpointKind::AnchorText,
    params: &[
        param_or("scope", "phrase_to_page", ParamType::Scope),
        param_or("sort", "domains_linking_page", ParamType::Sort),
        param("cols", ParamType::Columns(ColumnKind::AnchorText)),
        param("offset", ParamType::Number),
        param("limit", ParamType::Number),
    ],
    scopes: &[
        "phrase_to_page",
        "phrase_to_subdomain",
        "phrase_to_domain",
        "term_to_page",
        "term_to_subdomain",
        "term_to_domain",
    ],
    mappings: &[
        ("phrase_to_page", SORT_ANCHOR),
        ("phrase_to_subdomain", SORT_ANCHOR),
        ("phrase_to_domain", SORT_ANCHOR),
        ("term_to_page", SORT_ANCHOR),
        ("term_to_subdomain", SORT_ANCHOR),
        ("term_to_domain", SORT_ANCHOR),
    ],
    filters: &[],
    targets: None,
};

static TOP_PAGES: EndpointSchema = EndpointSchema {
    kind: EndpointKind::TopPages,
    params: &[
        param("cols", ParamType::Columns(ColumnKind::UrlMetrics)),
        param("offset", ParamType::Number),
        param("limit", ParamType::Number),
    ],
    scopes: &[],
    mappings: &[],
    filters: &[],
    targets: None,
};

static METADATA: EndpointSchema = EndpointSchema {
    kind: EndpointKind::Metadata,
    params: &[],
    scopes: &[],
    mappings: &[],
    filters: &[],
    targets: Some(&["last_update", "next_update", "index_stats"]),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in EndpointKind::ALL {
            assert_eq!(kind.as_str().parse::<EndpointKind>().unwrap(), kind);
            assert_eq!(kind.schema().kind, kind);
        }
        assert!("backlinks".parse::<EndpointKind>().is_err());
    }

    #[test]
    fn test_bit_flag_mapping() {
        let links = EndpointKind::Links.schema();
        assert_eq!(links.bit_flag_mapping("targetCols"), Some(ColumnKind::UrlMetrics));
        assert_eq!(links.bit_flag_mapping("linkCols"), Some(ColumnKind::Links));
        assert_eq!(links.bit_flag_mapping("scope"), None);
        assert_eq!(links.bit_flag_mapping("nonsense"), None);
    }

    #[test]
    fn test_defaults() {
        let links = EndpointKind::Links.schema();
        assert_eq!(links.param("scope").unwrap().default, Some("page_to_page"));
        assert_eq!(links.param("limit").unwrap().default, None);
        assert!(EndpointKind::UrlMetrics.schema().params.iter().all(|p| p.default.is_none()));
    }

    #[test]
    fn test_every_scope_has_a_mapping() {
        for kind in EndpointKind::ALL {
            let schema = kind.schema();
            for scope in schema.scopes {
                assert!(
                    schema.mappings.iter().any(|(s, _)| s == scope),
                    "{kind}: {scope}"
                );
            }
        }
    }

    #[test]
    fn test_deprecated_flags() {
        let flags = EndpointKind::Links.schema().deprecated_flags();
        assert!(flags.contains(&"MozRank: Subdomain Combined"));
        assert!(EndpointKind::Metadata.schema().deprecated_flags().is_empty());
    }

    #[test]
    fn test_only_metadata_has_fixed_targets() {
        for kind in EndpointKind::ALL {
            assert_eq!(kind.schema().targets_are_urls(), kind != EndpointKind::Metadata);
        }
    }
}
