//! Linkscape API CLI binary.
//!
//! A command-line interface for querying the Moz Linkscape API.

use clap::Parser;
use linkscape::cli::{Cli, Command};
use linkscape::output::{scalar, EndpointResponse, PrettyPrint};
use linkscape::{explain, humanize, EndpointKind, LinkscapeClient, Params};
use serde_json::Value;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Command::Explain { code } = &cli.command {
        println!("{}", explain(code));
        return ExitCode::SUCCESS;
    }

    let client = match LinkscapeClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set LINKSCAPE_ACCESS_ID and LINKSCAPE_SECRET_KEY environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &LinkscapeClient, cli: Cli) -> linkscape::Result<()> {
    match cli.command {
        Command::Get {
            endpoint,
            targets,
            query,
        } => {
            let kind = EndpointKind::from(endpoint);
            let responses = client
                .endpoint(kind)
                .get(targets.clone(), &query.to_params())
                .await?;
            output(kind, &targets, &responses, cli.json)
        }
        Command::Post { targets, cols } => {
            let mut params = Params::new();
            if !cols.is_empty() {
                params = params.cols(cols);
            }
            let response = client.url_metrics().post(targets.clone(), &params).await?;
            // One result per target, in request order
            let responses = match response {
                Value::Array(items) => items,
                other => vec![other],
            };
            output(EndpointKind::UrlMetrics, &targets, &responses, cli.json)
        }
        Command::Explain { .. } => Ok(()),
    }
}

fn output(
    kind: EndpointKind,
    targets: &[String],
    responses: &[Value],
    json: bool,
) -> linkscape::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(responses)?);
        return Ok(());
    }

    if kind == EndpointKind::UrlMetrics && targets.len() > 1 {
        let rows: Vec<MetricRow> = targets
            .iter()
            .zip(responses)
            .flat_map(|(target, body)| MetricRow::from_response(target, body))
            .collect();
        println!("{}", Table::new(rows));
        return Ok(());
    }

    let blocks: Vec<String> = targets
        .iter()
        .zip(responses)
        .map(|(target, body)| {
            EndpointResponse {
                kind,
                target,
                body,
            }
            .pretty_print()
        })
        .collect();
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

// Table row type for non-JSON output

#[derive(Tabled)]
struct MetricRow {
    target: String,
    metric: String,
    value: String,
}

impl MetricRow {
    fn from_response(target: &str, body: &Value) -> Vec<Self> {
        match humanize(body) {
            Value::Object(fields) => fields
                .iter()
                .map(|(metric, value)| Self {
                    target: target.to_string(),
                    metric: metric.clone(),
                    value: scalar(value),
                })
                .collect(),
            other => vec![Self {
                target: target.to_string(),
                metric: String::new(),
                value: scalar(&other),
            }],
        }
    }
}
