use std::path::PathBuf;
use axum::http::Request;
use clap::{Args, Parser, Subcommand};

use edge_request_logger::config::loader::{load_config, parse_config};
use edge_request_logger::config::{LoggerConfig, LoggerSettings};
use edge_request_logger::{EdgeMetadata, IngestClient, Level, MetaValue, RequestLogger};

#[derive(Parser)]
#[command(name = "edge-logger-cli")]
#[command(about = "Send or preview a one-off request log batch", long_about = None)]
struct Cli {
    /// TOML config file. Without one, defaults and environment overrides apply.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log the messages for a synthetic request and flush them once
    Send(BatchArgs),
    /// Print the batch that would be sent, without sending it
    Preview(BatchArgs),
}

#[derive(Args)]
struct BatchArgs {
    /// URL of the synthetic request
    #[arg(long, default_value = "http://localhost/")]
    url: String,

    /// Method of the synthetic request
    #[arg(long, default_value = "GET")]
    method: String,

    /// Request header, `name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Level of every message
    #[arg(short, long, default_value = "info")]
    level: Level,

    /// Meta override, `key=value`; integers are sent as numbers (repeatable)
    #[arg(short, long = "meta", value_parser = parse_meta)]
    meta: Vec<(String, String)>,

    /// Messages to log, in order
    #[arg(required = true)]
    messages: Vec<String>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected 'name: value', got '{raw}'"))
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected 'key=value', got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_request_logger=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let (args, send) = match cli.command {
        Commands::Send(args) => (args, true),
        Commands::Preview(args) => (args, false),
    };

    // Preview does not need a deliverable config.
    let config = match (&cli.config, send) {
        (Some(path), true) => load_config(path)?,
        (None, true) => parse_config("", |name| std::env::var(name).ok())?,
        (Some(path), false) => toml::from_str(&std::fs::read_to_string(path)?)?,
        (None, false) => LoggerConfig::default(),
    };
    let settings = LoggerSettings::from(&config);

    let mut builder = Request::builder().method(args.method.as_str()).uri(args.url.as_str());
    for (name, value) in &args.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut request = builder.body(())?;
    let edge = EdgeMetadata::from_headers(request.headers());
    request.extensions_mut().insert(edge);

    let sink = IngestClient::new(settings.ingestion.clone());
    let mut logger = RequestLogger::new(&request, &settings, sink);
    for message in args.messages {
        logger.log(args.level, message);
    }
    for (key, value) in &args.meta {
        logger.set_meta(key.as_str(), MetaValue::parse_lossy(value));
    }

    if send {
        let lines = logger.len();
        logger.flush().await;
        eprintln!("Submitted {lines} line(s) to {}", settings.ingestion.endpoint);
    } else {
        println!("{}", serde_json::to_string_pretty(&logger.prepare_batch())?);
    }

    Ok(())
}
