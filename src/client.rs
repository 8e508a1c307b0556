//! Linkscape API client.
//!
//! Holds the credentials, the shared request signer and the transport.
//! Endpoint-specific operations live on [`EndpointClient`].

use std::env;
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::endpoint::EndpointClient;
use crate::error::{LinkscapeError, Result};
use crate::params::Params;
use crate::schema::EndpointKind;
use crate::signer::{Clock, Credentials, Signer};
use crate::transport::{HttpTransport, Transport};
use crate::url_builder::{UrlBuilder, DEFAULT_BASE_URL};

/// Linkscape API client.
///
/// This struct is cheaply cloneable; clones share the transport and the
/// signer.
///
/// # Example
///
/// ```no_run
/// use linkscape::{Credentials, LinkscapeClient};
///
/// # fn example() -> linkscape::Result<()> {
/// // Create from environment variables
/// let client = LinkscapeClient::from_env()?;
///
/// // Or configure manually
/// let client = LinkscapeClient::new(
///     Credentials::new("member-123", "secret")?,
///     "http://lsapi.seomoz.com/linkscape/",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LinkscapeClient {
    base_url: Arc<Url>,
    signer: Arc<Mutex<Signer>>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for LinkscapeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkscapeClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_id", &self.signer.lock().access_id())
            .finish_non_exhaustive()
    }
}

impl LinkscapeClient {
    /// Create a client from environment variables.
    ///
    /// Reads:
    /// - `LINKSCAPE_ACCESS_ID` (required)
    /// - `LINKSCAPE_SECRET_KEY` (required)
    /// - `LINKSCAPE_API_URL` (optional, defaults to `http://lsapi.seomoz.com/linkscape/`)
    ///
    /// # Errors
    ///
    /// Returns an error if `LINKSCAPE_ACCESS_ID` or `LINKSCAPE_SECRET_KEY` is
    /// not set or empty, or if the base URL is invalid.
    pub fn from_env() -> Result<Self> {
        let access_id = env::var("LINKSCAPE_ACCESS_ID").map_err(|_| {
            LinkscapeError::ConfigMissing("LINKSCAPE_ACCESS_ID environment variable".to_string())
        })?;
        let secret_key = env::var("LINKSCAPE_SECRET_KEY").map_err(|_| {
            LinkscapeError::ConfigMissing("LINKSCAPE_SECRET_KEY environment variable".to_string())
        })?;
        let base_url =
            env::var("LINKSCAPE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(Credentials::new(access_id, secret_key)?, &base_url)
    }

    /// Create a client with explicit credentials and base URL.
    ///
    /// A signature is generated immediately, so the client is ready to sign
    /// requests as soon as it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Self::with_transport(credentials, base_url, Arc::new(transport))
    }

    /// Create a client that sends requests through a custom transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_transport(
        credentials: Credentials,
        base_url: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url_str)?;

        let mut signer = Signer::new(credentials);
        signer.generate();

        Ok(Self {
            base_url: Arc::new(base_url),
            signer: Arc::new(Mutex::new(signer)),
            transport,
        })
    }

    /// Swap the signer's clock, regenerating the signature against it.
    #[must_use]
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        {
            let mut signer = self.signer.lock();
            signer.set_clock(clock);
            signer.generate();
        }
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Change how long new signatures stay valid.
    pub fn set_expires_threshold(&self, seconds: u64) {
        self.signer.lock().set_expires_threshold(seconds);
    }

    /// Expiry of the most recent signature.
    pub fn expires_at(&self) -> Option<i64> {
        self.signer.lock().expires_at()
    }

    /// Build a signed URL for `kind`. Parameters are not validated here.
    pub fn build_url(
        &self,
        kind: EndpointKind,
        params: &Params,
        target: Option<&str>,
    ) -> Result<String> {
        let mut signer = self.signer.lock();
        UrlBuilder::new(self.base_url.as_str(), kind).build_url(params, target, &mut signer)
    }

    /// Client for an arbitrary endpoint kind.
    pub fn endpoint(&self, kind: EndpointKind) -> EndpointClient {
        EndpointClient::new(self.clone(), kind)
    }

    /// Client for the url-metrics endpoint.
    pub fn url_metrics(&self) -> EndpointClient {
        self.endpoint(EndpointKind::UrlMetrics)
    }

    /// Client for the links endpoint.
    pub fn links(&self) -> EndpointClient {
        self.endpoint(EndpointKind::Links)
    }

    /// Client for the anchor-text endpoint.
    pub fn anchor_text(&self) -> EndpointClient {
        self.endpoint(EndpointKind::AnchorText)
    }

    /// Client for the top-pages endpoint.
    pub fn top_pages(&self) -> EndpointClient {
        self.endpoint(EndpointKind::TopPages)
    }

    /// Client for the metadata endpoint.
    pub fn metadata(&self) -> EndpointClient {
        self.endpoint(EndpointKind::Metadata)
    }
}
