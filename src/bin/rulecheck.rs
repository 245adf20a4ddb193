use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;

use request_conditions::config::load_config;
use request_conditions::routing::RuleTable;

#[derive(Parser)]
#[command(name = "rulecheck")]
#[command(about = "Evaluate a rules file against a synthetic request", long_about = None)]
struct Cli {
    /// Path to the TOML rules file.
    #[arg(short, long)]
    config: PathBuf,

    /// Request method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as 'Name: value'. Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Only load and validate the rules file.
    #[arg(long)]
    check: bool,

    /// Request URI, e.g. '/api/users?page=2'.
    #[arg(default_value = "/")]
    uri: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let table = RuleTable::from_config(&config.rules)?;

    if cli.check {
        println!("{}: {} rule(s) OK", cli.config.display(), table.len());
        return Ok(());
    }

    let request = build_request(&cli)?;
    let report = report(&cli, &table, &request);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// JSON report of every rule's outcome for `request`.
fn report(cli: &Cli, table: &RuleTable, request: &Request<Body>) -> Value {
    let rules: Vec<Value> = table
        .evaluate_all(request)
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(matched) => json!({ "name": outcome.name, "matched": matched }),
            Err(e) => json!({ "name": outcome.name, "error": e.to_string() }),
        })
        .collect();

    json!({
        "method": cli.method,
        "uri": cli.uri,
        "rules": rules,
    })
}

fn build_request(cli: &Cli) -> Result<Request<Body>, Box<dyn std::error::Error>> {
    let mut builder = Request::builder()
        .method(cli.method.as_str())
        .uri(cli.uri.as_str());

    for raw in &cli.headers {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected 'Name: value'", raw))?;
        builder = builder.header(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }

    Ok(builder.body(Body::empty())?)
}
