//! Moz Linkscape API client library.
//!
//! Builds signed, parameter-encoded requests against the Linkscape
//! endpoints, validating parameters against per-endpoint schemas before
//! anything is sent, and decodes column bitmasks back into metric names.
//!
//! # Quick Start
//!
//! ```no_run
//! use linkscape::{LinkscapeClient, Params};
//!
//! #[tokio::main]
//! async fn main() -> linkscape::Result<()> {
//!     // Create client from environment variables
//!     let client = LinkscapeClient::from_env()?;
//!
//!     // Page and domain authority for two URLs, fetched concurrently
//!     let params = Params::new().cols(["Page Authority", "Domain Authority"]);
//!     let metrics = client
//!         .url_metrics()
//!         .get(vec!["moz.com", "moz.com/blog"], &params)
//!         .await?;
//!     for m in &metrics {
//!         println!("{}", linkscape::humanize(m));
//!     }
//!
//!     // External links to a domain, strongest first
//!     let params = Params::new()
//!         .with("scope", "page_to_domain")
//!         .with("sort", "domains_linking_domain")
//!         .with_list("filter", ["external"])
//!         .with_list("sourceCols", ["Title"])
//!         .with("limit", 25);
//!     let links = client.links().get("moz.com", &params).await?;
//!     println!("{}", links[0]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`columns`] - column label ↔ bit position registries
//! - [`Signer`] - time-boxed HMAC-SHA1 request signatures
//! - [`validation`] - parameter checks against an [`EndpointSchema`]
//! - [`url_builder`] - path, query and signed auth parameter assembly
//! - [`EndpointClient`] - `get`/`post` for one endpoint, over a [`Transport`]
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `LINKSCAPE_ACCESS_ID` (required) - Your API access id
//! - `LINKSCAPE_SECRET_KEY` (required) - Your API secret key
//! - `LINKSCAPE_API_URL` (optional) - Base URL (defaults to `http://lsapi.seomoz.com/linkscape/`)

pub mod cli;
mod client;
pub mod columns;
mod endpoint;
mod error;
mod explain;
pub mod output;
mod params;
mod schema;
mod signer;
mod transport;
pub mod url_builder;
pub mod validation;

// Re-export core types
pub use client::LinkscapeClient;
pub use endpoint::EndpointClient;
pub use error::{ErrorKind, LinkscapeError, Result};
pub use params::{Params, Targets};
pub use transport::{HttpTransport, Transport};

// Re-export signing
pub use signer::{Clock, Credentials, FixedClock, Signer, SystemClock, DEFAULT_EXPIRES_THRESHOLD};

// Re-export schema types
pub use columns::{ColumnFlag, ColumnKind, ColumnMask};
pub use schema::{EndpointKind, EndpointSchema, ParamSpec, ParamType, ScopeMapping};
pub use validation::Validity;

// Re-export convenience functions
pub use explain::{explain, humanize, NO_EXPLANATION};
pub use url_builder::{to_title_case, UrlBuilder};
