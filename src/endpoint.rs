//! Per-endpoint request clients.

use reqwest::Method;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::client::LinkscapeClient;
use crate::error::Result;
use crate::explain;
use crate::params::{Params, Targets};
use crate::schema::{EndpointKind, EndpointSchema};
use crate::validation::{self, Validity};

/// Requests against one endpoint kind.
///
/// Every endpoint shares the same behaviour; what differs is the schema
/// the parameters are checked against.
///
/// # Example
///
/// ```no_run
/// use linkscape::{LinkscapeClient, Params};
///
/// # async fn example() -> linkscape::Result<()> {
/// let client = LinkscapeClient::from_env()?;
/// let metrics = client
///     .url_metrics()
///     .get(
///         vec!["moz.com", "seomoz.org/blog"],
///         &Params::new().cols(["Title", "Page Authority"]),
///     )
///     .await?;
/// println!("{} responses", metrics.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EndpointClient {
    client: LinkscapeClient,
    kind: EndpointKind,
}

impl EndpointClient {
    /// Create a client for `kind`.
    pub fn new(client: LinkscapeClient, kind: EndpointKind) -> Self {
        Self { client, kind }
    }

    /// The endpoint kind.
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// The endpoint schema.
    pub fn schema(&self) -> &'static EndpointSchema {
        self.kind.schema()
    }

    /// Human-readable description of a code.
    pub fn explain(&self, code: &str) -> &'static str {
        explain::explain(code)
    }

    /// Validate parameters against this endpoint's schema.
    ///
    /// Deprecated columns pass; their warnings are logged once here and
    /// returned in [`Validity::Deprecated`].
    pub fn check(&self, params: &Params) -> Result<Validity> {
        let validity = validation::validate_params(params, self.schema())?;
        for warning in validity.warnings() {
            tracing::warn!(endpoint = %self.kind, "{warning}");
        }
        Ok(validity)
    }

    /// Validate the target and parameters, then build the signed URL
    /// without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the target or a parameter is invalid.
    pub fn url(&self, params: &Params, target: Option<&str>) -> Result<String> {
        if let Some(target) = target {
            validation::validate_targets(&Targets::from(target), self.schema())?;
        }
        self.check(params)?;
        self.client.build_url(self.kind, params, target)
    }

    /// Fetch one or more targets.
    ///
    /// One GET is issued per target, all concurrently. Responses come back
    /// in target order. If any request fails the whole call fails; requests
    /// already in flight are left to finish on their own.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before anything is sent. Otherwise
    /// the first transport error is returned.
    #[tracing::instrument(skip(self, targets, params), fields(endpoint = %self.kind))]
    pub async fn get(&self, targets: impl Into<Targets>, params: &Params) -> Result<Vec<Value>> {
        let targets = targets.into();
        validation::validate_targets(&targets, self.schema())?;
        self.check(params)?;

        let urls = targets
            .to_vec()
            .iter()
            .map(|t| self.client.build_url(self.kind, params, Some(t)))
            .collect::<Result<Vec<_>>>()?;

        let mut set = JoinSet::new();
        for (index, url) in urls.into_iter().enumerate() {
            let transport = self.client.transport().clone();
            set.spawn(async move { (index, transport.perform(Method::GET, &url, None).await) });
        }

        let mut responses: Vec<Option<Value>> = vec![None; set.len()];
        while let Some(joined) = set.join_next().await {
            // Tasks are never aborted, so a join error is always a panic
            let (index, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    set.detach_all();
                    std::panic::resume_unwind(e.into_panic());
                }
            };
            match result {
                Ok(value) => responses[index] = Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "request failed, detaching the rest");
                    set.detach_all();
                    return Err(e);
                }
            }
        }

        Ok(responses.into_iter().flatten().collect())
    }

    /// Send several targets in one request body.
    ///
    /// # Errors
    ///
    /// Returns an error if a target or parameter is invalid, or the request
    /// fails.
    #[tracing::instrument(skip(self, targets, params), fields(endpoint = %self.kind))]
    pub async fn post(&self, targets: impl Into<Targets>, params: &Params) -> Result<Value> {
        let targets = targets.into();
        validation::validate_targets(&targets, self.schema())?;
        self.check(params)?;

        let url = self.client.build_url(self.kind, params, None)?;
        let body = Value::from(targets.to_vec());
        self.client
            .transport()
            .perform(Method::POST, &url, Some(&body))
            .await
    }
}
