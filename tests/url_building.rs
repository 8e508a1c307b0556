//! Signed URL assembly through the public API.

use std::collections::HashMap;
use std::sync::Arc;

use linkscape::{
    Credentials, EndpointKind, FixedClock, LinkscapeClient, LinkscapeError, Params, Signer,
    UrlBuilder,
};

const FROZEN_MS: i64 = 1_330_688_329_321;

fn client() -> LinkscapeClient {
    LinkscapeClient::new(
        Credentials::new("mozscape-test", "supersecret").unwrap(),
        "http://lsapi.seomoz.com/linkscape/",
    )
    .unwrap()
    .with_clock(Arc::new(FixedClock(FROZEN_MS)))
}

fn query_of(url: &str) -> HashMap<String, String> {
    let (_, query) = url.split_once('?').expect("url has a query");
    serde_qs::from_str(query).expect("query decodes")
}

#[test]
fn test_links_url_query_fields() {
    let params = Params::new()
        .with("scope", "domain_to_domain")
        .with("sort", "domains_linking_domain")
        .with_list("targetCols", ["Title", "Domain Authority"])
        .with_list("sourceCols", ["Page Authority"])
        .with("offset", 50)
        .with("limit", 25);

    let url = client().links().url(&params, Some("moz.com")).unwrap();
    assert!(url.starts_with("http://lsapi.seomoz.com/linkscape/links/moz.com?Scope="));

    let query = query_of(&url);
    assert_eq!(query["Scope"], "domain_to_domain");
    assert_eq!(query["Sort"], "domains_linking_domain");
    assert_eq!(query["TargetCols"], "68719476737");
    assert_eq!(query["SourceCols"], "34359738368");
    assert_eq!(query["Offset"], "50");
    assert_eq!(query["Limit"], "25");
    assert_eq!(query["AccessID"], "mozscape-test");
    assert_eq!(query["Expires"], "1330688629");
    assert!(query.contains_key("Signature"));
}

#[test]
fn test_query_field_order_is_fixed() {
    let params = Params::new()
        .with("limit", 10)
        .with("sort", "domains_linking_page")
        .with_list("cols", ["Term or Phrase"]);

    let url = client().anchor_text().url(&params, Some("moz.com")).unwrap();
    let (_, query) = url.split_once('?').unwrap();
    let keys: Vec<&str> = query
        .split('&')
        .map(|pair| pair.split('=').next().unwrap())
        .collect();

    assert_eq!(
        keys,
        vec!["Scope", "Sort", "Cols", "Limit", "AccessID", "Expires", "Signature"]
    );
}

#[test]
fn test_target_is_fully_percent_encoded() {
    let url = client()
        .top_pages()
        .url(&Params::new(), Some("https://moz.com/blog?page=2"))
        .unwrap();
    assert!(url.contains("/top-pages/https%3A%2F%2Fmoz.com%2Fblog%3Fpage%3D2?AccessID="));
}

#[test]
fn test_url_rejects_unrecognized_parameter() {
    let err = client()
        .top_pages()
        .url(&Params::new().with("scope", "page_to_page"), None)
        .unwrap_err();
    assert!(matches!(err, LinkscapeError::UnrecognizedParameter(ref k) if k == "scope"));
}

#[test]
fn test_builder_without_validation_ignores_unknown_keys() {
    let creds = Credentials::new("mozscape-test", "supersecret").unwrap();
    let mut signer = Signer::with_clock(creds, Arc::new(FixedClock(FROZEN_MS)));

    let url = UrlBuilder::default_base(EndpointKind::UrlMetrics)
        .build_url(
            &Params::new().cols(["Title"]).with("scope", "page_to_page"),
            Some("moz.com"),
            &mut signer,
        )
        .unwrap();

    assert_eq!(
        url,
        "http://lsapi.seomoz.com/linkscape/url-metrics/moz.com?Cols=1\
         &AccessID=mozscape-test&Expires=1330688629\
         &Signature=wOH3XnmO%2Bl7l2B8Y3OPwkRGV9Fo%3D"
    );
}

#[test]
fn test_deprecated_column_still_builds() {
    let url = client()
        .url_metrics()
        .url(&Params::new().cols(["MozRank: Root Domain Combined"]), None)
        .unwrap();
    assert!(url.contains("Cols=16777216&"));
}
