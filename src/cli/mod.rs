//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the linkscape binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::params::Params;
use crate::schema::EndpointKind;

/// Linkscape API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "linkscape", about = "Moz Linkscape API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log request details to stderr.
    #[arg(long, short, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one or more targets from an endpoint.
    Get {
        /// The endpoint to query.
        endpoint: Endpoint,

        /// Target URLs (or a metadata name such as `last_update`).
        #[arg(required = true)]
        targets: Vec<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Fetch url-metrics for several URLs in a single request.
    Post {
        /// Target URLs.
        #[arg(required = true)]
        targets: Vec<String>,

        /// Column labels to request.
        #[arg(long)]
        cols: Vec<String>,
    },

    /// Print the meaning of a response or endpoint code.
    Explain {
        /// The code to explain (e.g. `upa`).
        code: String,
    },
}

/// Endpoints that can be queried.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Metrics about a URL.
    #[value(alias = "metrics")]
    UrlMetrics,
    /// Links to a URL.
    Links,
    /// Anchor text of links to a URL.
    AnchorText,
    /// Top pages of a domain.
    TopPages,
    /// Index metadata.
    Metadata,
}

impl From<Endpoint> for EndpointKind {
    fn from(e: Endpoint) -> Self {
        match e {
            Endpoint::UrlMetrics => EndpointKind::UrlMetrics,
            Endpoint::Links => EndpointKind::Links,
            Endpoint::AnchorText => EndpointKind::AnchorText,
            Endpoint::TopPages => EndpointKind::TopPages,
            Endpoint::Metadata => EndpointKind::Metadata,
        }
    }
}

/// Query parameters shared by the `get` endpoints.
///
/// Only the flags that are given end up in the request; flags an endpoint
/// does not accept are rejected by validation.
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Column labels (url-metrics, anchor-text, top-pages).
    #[arg(long)]
    pub cols: Vec<String>,

    /// Link scope, e.g. `page_to_domain`.
    #[arg(long)]
    pub scope: Option<String>,

    /// Sort field, e.g. `page_authority`.
    #[arg(long)]
    pub sort: Option<String>,

    /// Link filters, e.g. `external`.
    #[arg(long)]
    pub filter: Vec<String>,

    /// URL metric columns for link targets.
    #[arg(long)]
    pub target_cols: Vec<String>,

    /// URL metric columns for link sources.
    #[arg(long)]
    pub source_cols: Vec<String>,

    /// Link columns.
    #[arg(long)]
    pub link_cols: Vec<String>,

    /// Number of results to return.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Number of results to skip.
    #[arg(long)]
    pub offset: Option<u32>,
}

impl QueryArgs {
    /// Convert the given flags into request parameters.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        let lists = [
            ("cols", &self.cols),
            ("filter", &self.filter),
            ("targetCols", &self.target_cols),
            ("sourceCols", &self.source_cols),
            ("linkCols", &self.link_cols),
        ];
        for (name, items) in lists {
            if !items.is_empty() {
                params = params.with_list(name, items.iter().cloned());
            }
        }
        if let Some(scope) = &self.scope {
            params.insert("scope", scope.as_str());
        }
        if let Some(sort) = &self.sort {
            params.insert("sort", sort.as_str());
        }
        if let Some(limit) = self.limit {
            params.insert("limit", limit);
        }
        if let Some(offset) = self.offset {
            params.insert("offset", offset);
        }
        params
    }
}
