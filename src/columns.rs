//! Column flag registries.
//!
//! Every endpoint that returns metrics selects its columns with a bitmask.
//! Each registry below maps a human-readable column label to its bit
//! position for one kind of column. Positions go well past 32 bits
//! (Domain Authority sits at bit 36), so masks are carried as `u64`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LinkscapeError, Result};

/// The column registries known to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    /// Per-URL metrics, also used for link source/target columns.
    UrlMetrics,
    /// Columns describing the link itself.
    Links,
    /// Anchor text columns.
    AnchorText,
    /// The `lf` bitfield returned on every link.
    LinkFlags,
}

impl ColumnKind {
    /// The registry name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UrlMetrics => "url-metrics",
            Self::Links => "links",
            Self::AnchorText => "anchor-text",
            Self::LinkFlags => "link-flags",
        }
    }

    /// All flags in this registry, in bit order.
    pub fn flags(&self) -> &'static [ColumnFlag] {
        match self {
            Self::UrlMetrics => URL_METRICS,
            Self::Links => LINK_COLUMNS,
            Self::AnchorText => ANCHOR_TEXT,
            Self::LinkFlags => LINK_FLAGS,
        }
    }

    /// Labels that still resolve but are no longer served.
    pub fn deprecated_labels(&self) -> impl Iterator<Item = &'static str> {
        self.flags()
            .iter()
            .filter(|f| f.deprecated)
            .map(|f| f.label)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFlag {
    /// Human-readable label callers pass in column lists.
    pub label: &'static str,
    /// Bit position within the registry.
    pub bit: u32,
    /// Short field name the API uses in responses, if any.
    pub code: Option<&'static str>,
    /// Legacy column: accepted with a warning.
    pub deprecated: bool,
}

impl ColumnFlag {
    const fn new(label: &'static str, bit: u32, code: &'static str) -> Self {
        Self {
            label,
            bit,
            code: Some(code),
            deprecated: false,
        }
    }

    const fn flag(label: &'static str, bit: u32) -> Self {
        Self {
            label,
            bit,
            code: None,
            deprecated: false,
        }
    }

    const fn deprecated(self) -> Self {
        Self {
            deprecated: true,
            ..self
        }
    }

    /// The value of this flag alone in a mask.
    pub fn mask(&self) -> u64 {
        1u64 << self.bit
    }
}

static URL_METRICS: &[ColumnFlag] = &[
    ColumnFlag::new("Title", 0, "ut"),
    ColumnFlag::new("Canonical URL", 2, "uu"),
    ColumnFlag::new("Subdomain", 3, "ufq"),
    ColumnFlag::new("Root Domain", 4, "upl"),
    ColumnFlag::new("External Equity Links", 5, "ueid"),
    ColumnFlag::new("Subdomain External Links", 6, "feid"),
    ColumnFlag::new("Root Domain External Links", 7, "peid"),
    ColumnFlag::new("Equity Links", 8, "ujid"),
    ColumnFlag::new("Subdomains Linking", 9, "uifq"),
    ColumnFlag::new("Root Domains Linking", 10, "uipl"),
    ColumnFlag::new("Links", 11, "uid"),
    ColumnFlag::new("Subdomain Subdomains Linking", 12, "fid"),
    ColumnFlag::new("Root Domain Root Domains Linking", 13, "pid"),
    ColumnFlag::new("MozRank: URL", 14, "umrp"),
    ColumnFlag::new("MozRank: Subdomain", 15, "fmrp"),
    ColumnFlag::new("MozRank: Root Domain", 16, "pmrp"),
    ColumnFlag::new("MozTrust", 17, "utrp"),
    ColumnFlag::new("MozTrust: Subdomain", 18, "ftrp"),
    ColumnFlag::new("MozTrust: Root Domain", 19, "ptrp"),
    ColumnFlag::new("MozRank: External Equity", 20, "uemrp"),
    ColumnFlag::new("MozRank: Subdomain, External Equity", 21, "fejp"),
    ColumnFlag::new("MozRank: Root Domain, External Equity", 22, "pejp"),
    ColumnFlag::new("MozRank: Subdomain Combined", 23, "fjp").deprecated(),
    ColumnFlag::new("MozRank: Root Domain Combined", 24, "pjp").deprecated(),
    ColumnFlag::new("Subdomain Spam Score", 26, "fspsc"),
    ColumnFlag::new("HTTP Status Code", 29, "us"),
    ColumnFlag::new("Page Authority", 35, "upa"),
    ColumnFlag::new("Domain Authority", 36, "pda"),
    ColumnFlag::new("External Links", 39, "ued"),
    ColumnFlag::new("Links to Subdomain", 42, "fuid"),
    ColumnFlag::new("Links to Root Domain", 43, "puid"),
    ColumnFlag::new("Root Domains Linking to Subdomain", 44, "fipl"),
    ColumnFlag::new("External Links to Subdomain", 47, "fed"),
    ColumnFlag::new("External Links to Root Domain", 48, "ped"),
    ColumnFlag::new("Linking C Blocks", 55, "pib"),
    ColumnFlag::new("Time Last Crawled", 57, "ulc"),
];

static LINK_COLUMNS: &[ColumnFlag] = &[
    ColumnFlag::new("Flags", 1, "lf"),
    ColumnFlag::new("Anchor Text", 2, "lt"),
    ColumnFlag::new("Normalized Anchor Text", 3, "lnt"),
    ColumnFlag::new("MozRank Passed", 4, "lmrp"),
];

static ANCHOR_TEXT: &[ColumnFlag] = &[
    ColumnFlag::new("Term or Phrase", 1, "apuut"),
    ColumnFlag::new("Internal Pages Linking", 3, "apuiu"),
    ColumnFlag::new("Internal Subdomains Linking", 4, "apuif"),
    ColumnFlag::new("External Pages Linking", 5, "apueu"),
    ColumnFlag::new("External Subdomains Linking", 6, "apuef"),
    ColumnFlag::new("External Root Domains Linking", 7, "apuep"),
    ColumnFlag::new("Internal MozRank Passed", 8, "apuimp"),
    ColumnFlag::new("External MozRank Passed", 9, "apuemp"),
    ColumnFlag::new("Flags", 10, "apuf"),
];

static LINK_FLAGS: &[ColumnFlag] = &[
    ColumnFlag::flag("No Follow", 0),
    ColumnFlag::flag("Same Subdomain", 1),
    ColumnFlag::flag("Meta Refresh", 2),
    ColumnFlag::flag("Same IP Address", 3),
    ColumnFlag::flag("Same C Block", 4),
    ColumnFlag::flag("Spam Detected", 5).deprecated(),
    ColumnFlag::flag("301", 6),
    ColumnFlag::flag("302", 7),
    ColumnFlag::flag("No Script", 8),
    ColumnFlag::flag("Off Screen", 9),
    ColumnFlag::flag("Meta No Follow", 10),
    ColumnFlag::flag("Same Root Domain", 11),
    ColumnFlag::flag("Feed Autodiscovery", 13),
    ColumnFlag::flag("Rel Canonical", 14),
    ColumnFlag::flag("Via 301", 15),
];

/// A combined column mask and any advisory warnings raised building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMask {
    /// Bitwise OR of every resolved column.
    pub bits: u64,
    /// One message per deprecated label that was used.
    pub warnings: Vec<String>,
}

/// Look up a single flag by exact label.
pub fn lookup(kind: ColumnKind, label: &str) -> Result<&'static ColumnFlag> {
    kind.flags()
        .iter()
        .find(|f| f.label == label)
        .ok_or_else(|| LinkscapeError::InvalidFlag {
            kind: kind.as_str(),
            label: label.to_string(),
        })
}

/// Resolve a label to its bit position.
///
/// Deprecated labels still resolve; the second element carries the warning.
/// Nothing is logged here, callers decide where warnings surface.
pub fn bit_position(kind: ColumnKind, label: &str) -> Result<(u32, Option<String>)> {
    let flag = lookup(kind, label)?;
    let warning = flag
        .deprecated
        .then(|| format!("{} column '{}' is deprecated", kind, flag.label));
    Ok((flag.bit, warning))
}

/// OR together the bits for every label.
///
/// Fails on the first label that is not in the registry.
pub fn bitmask_for<S: AsRef<str>>(kind: ColumnKind, labels: &[S]) -> Result<ColumnMask> {
    let mut mask = ColumnMask::default();
    for label in labels {
        let (bit, warning) = bit_position(kind, label.as_ref())?;
        mask.bits |= 1u64 << bit;
        mask.warnings.extend(warning);
    }
    Ok(mask)
}

/// Bitmask for a column list, dropping the warnings.
pub fn build_col<S: AsRef<str>>(labels: &[S], kind: ColumnKind) -> Result<u64> {
    bitmask_for(kind, labels).map(|m| m.bits)
}

/// Labels whose bits are set in `bits`, in bit order.
///
/// Bits with no registered label are ignored.
pub fn decode(kind: ColumnKind, bits: u64) -> Vec<&'static str> {
    kind.flags()
        .iter()
        .filter(|f| bits & f.mask() != 0)
        .map(|f| f.label)
        .collect()
}

/// Find the flag whose response code matches.
pub fn by_code(code: &str) -> Option<&'static ColumnFlag> {
    [
        ColumnKind::UrlMetrics,
        ColumnKind::Links,
        ColumnKind::AnchorText,
    ]
    .iter()
    .flat_map(|k| k.flags())
    .find(|f| f.code == Some(code))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_build_col_title_subdomain_links() {
        let bits = build_col(&["Title", "Subdomain", "Links"], ColumnKind::UrlMetrics).unwrap();
        assert_eq!(bits, 2057);
    }

    #[test]
    fn test_mask_exceeds_32_bits() {
        let bits = build_col(&["Title", "Domain Authority"], ColumnKind::UrlMetrics).unwrap();
        assert_eq!(bits, 68_719_476_737);
        assert!(bits > u64::from(u32::MAX));
    }

    #[test]
    fn test_mask_is_order_independent() {
        let a = build_col(&["Page Authority", "Links"], ColumnKind::UrlMetrics).unwrap();
        let b = build_col(&["Links", "Page Authority"], ColumnKind::UrlMetrics).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_label_names_offender() {
        let err = build_col(&["Title", "Page Awesomeness"], ColumnKind::UrlMetrics).unwrap_err();
        assert!(err.to_string().contains("Page Awesomeness"));
        assert!(err.to_string().contains("url-metrics"));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!(lookup(ColumnKind::UrlMetrics, "title").is_err());
        assert!(lookup(ColumnKind::UrlMetrics, "Title").is_ok());
    }

    #[test]
    fn test_registries_are_separate() {
        // "Flags" exists in links and anchor text, at different positions
        assert_eq!(bit_position(ColumnKind::Links, "Flags").unwrap().0, 1);
        assert_eq!(bit_position(ColumnKind::AnchorText, "Flags").unwrap().0, 10);
        assert!(lookup(ColumnKind::Links, "Title").is_err());
    }

    #[test]
    fn test_deprecated_label_warns_but_resolves() {
        let mask = bitmask_for(
            ColumnKind::UrlMetrics,
            &["Title", "MozRank: Subdomain Combined"],
        )
        .unwrap();
        assert_eq!(mask.bits, 1 | (1 << 23));
        assert_eq!(mask.warnings.len(), 1);
        assert!(mask.warnings[0].contains("MozRank: Subdomain Combined"));
    }

    #[test]
    fn test_decode_round_trip() {
        let labels = ["External Links", "Title", "Time Last Crawled", "HTTP Status Code"];
        let bits = build_col(&labels, ColumnKind::UrlMetrics).unwrap();
        let decoded: HashSet<_> = decode(ColumnKind::UrlMetrics, bits).into_iter().collect();
        let expected: HashSet<_> = labels.into_iter().collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_link_flags() {
        // nofollow + 301
        assert_eq!(decode(ColumnKind::LinkFlags, 65), vec!["No Follow", "301"]);
        // unassigned bit 12 is ignored
        assert!(decode(ColumnKind::LinkFlags, 1 << 12).is_empty());
    }

    #[test]
    fn test_by_code() {
        assert_eq!(by_code("upa").map(|f| f.label), Some("Page Authority"));
        assert!(by_code("nope").is_none());
    }

    #[test]
    fn test_registry_bits_are_unique() {
        for kind in [
            ColumnKind::UrlMetrics,
            ColumnKind::Links,
            ColumnKind::AnchorText,
            ColumnKind::LinkFlags,
        ] {
            let bits: HashSet<_> = kind.flags().iter().map(|f| f.bit).collect();
            assert_eq!(bits.len(), kind.flags().len(), "{kind}");
            assert!(kind.flags().iter().all(|f| f.bit < 64));
        }
    }
}
