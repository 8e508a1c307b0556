//! Request tests against a mocked Linkscape API.
//!
//! Uses wiremock to check the exact requests the endpoint clients send
//! and how responses and failures come back.

use std::sync::Arc;

use linkscape::{Credentials, ErrorKind, FixedClock, LinkscapeClient, LinkscapeError, Params};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FROZEN_MS: i64 = 1_330_688_329_321;
const EXPIRES: &str = "1330688629";
const SIGNATURE: &str = "wOH3XnmO+l7l2B8Y3OPwkRGV9Fo=";

fn client_for(server: &MockServer) -> LinkscapeClient {
    let credentials = Credentials::new("mozscape-test", "supersecret").unwrap();
    LinkscapeClient::new(credentials, &format!("{}/linkscape", server.uri()))
        .unwrap()
        .with_clock(Arc::new(FixedClock(FROZEN_MS)))
}

#[tokio::test]
async fn test_url_metrics_get_sends_signed_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/linkscape/url-metrics/moz.com%2Fblog"))
        .and(query_param("Cols", "68719476737"))
        .and(query_param("Limit", "35"))
        .and(query_param("AccessID", "mozscape-test"))
        .and(query_param("Expires", EXPIRES))
        .and(query_param("Signature", SIGNATURE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ut": "Moz Blog", "pda": 93})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = Params::new()
        .cols(["Title", "Domain Authority"])
        .with("limit", 35);

    let responses = client
        .url_metrics()
        .get("moz.com/blog", &params)
        .await
        .expect("get should succeed");

    assert_eq!(responses, vec![json!({"ut": "Moz Blog", "pda": 93})]);
    assert_eq!(linkscape::humanize(&responses[0])["Domain Authority"], json!(93));
}

#[tokio::test]
async fn test_get_many_targets_returns_in_target_order() {
    let mock_server = MockServer::start().await;

    for (target, title) in [("a.com", "A"), ("b.com", "B"), ("c.com", "C")] {
        Mock::given(method("GET"))
            .and(path(format!("/linkscape/top-pages/{target}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"ut": title}])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let responses = client
        .top_pages()
        .get(["c.com", "a.com", "b.com"], &Params::new().cols(["Title"]))
        .await
        .expect("get should succeed");

    let titles: Vec<&str> = responses
        .iter()
        .map(|r| r[0]["ut"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_links_defaults_and_filters_reach_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/linkscape/links/moz.com"))
        .and(query_param("Scope", "page_to_page"))
        .and(query_param("Sort", "page_authority"))
        // `+` in a query string decodes to a space
        .and(query_param("Filter", "external nofollow"))
        .and(query_param("LinkCols", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"lf": 1, "lt": "moz"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = Params::new()
        .with_list("filter", ["external", "nofollow"])
        .with_list("linkCols", ["Flags", "Anchor Text"]);

    let responses = client.links().get("moz.com", &params).await.unwrap();
    let human = linkscape::humanize(&responses[0]);
    assert_eq!(human[0]["Flags"], json!(["No Follow"]));
}

#[tokio::test]
async fn test_post_sends_targets_as_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/linkscape/url-metrics/"))
        .and(query_param("Cols", "1"))
        .and(query_param("Signature", SIGNATURE))
        .and(body_json(json!(["moz.com", "seomoz.org"])))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"ut": "Moz"}, {"ut": "SEOmoz"}])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .url_metrics()
        .post(vec!["moz.com", "seomoz.org"], &Params::new().cols(["Title"]))
        .await
        .expect("post should succeed");

    assert_eq!(response.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_metadata_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/linkscape/metadata/last_update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"last_update": 1330560000})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let responses = client
        .metadata()
        .get("last_update", &Params::new())
        .await
        .unwrap();

    assert_eq!(responses[0]["last_update"], json!(1330560000));
}

#[tokio::test]
async fn test_api_error_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"status": "401", "error_message": "Permission denied."})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .url_metrics()
        .get(["moz.com", "seomoz.org"], &Params::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        LinkscapeError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(message, "Permission denied.");
            assert_eq!(status_code, Some(401));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_response_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .url_metrics()
        .get("moz.com", &Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, LinkscapeError::ParseError(_)));
}

#[tokio::test]
async fn test_invalid_params_send_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let err = client
        .url_metrics()
        .get("moz.com", &Params::new().cols(["Bogus Column"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = client
        .anchor_text()
        .get("moz.com", &Params::new().with("limit", "ten"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);

    let err = client
        .links()
        .get(
            "moz.com",
            &Params::new()
                .with("scope", "page_to_page")
                .with("sort", "domains_linking_domain"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid mapping between page_to_page and domains_linking_domain"
    );
}
