//! Command-line client: open an event stream and print its events.

use crate::config::Config;
use crate::error::Error;
use crate::http::{self, ReqwestTransport, Request, RequestOptions, headers};
use crate::sse::Event;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use reqwest::Method;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fetch a Server-Sent Events stream and print each event
#[derive(Parser, Debug)]
#[command(name = "ssefetch", version, about)]
pub struct Cli {
    /// URL of the event stream
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request header as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request body ("-" reads stdin, "@path" reads a file)
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Output format
    #[arg(short = 'o', long, default_value = "text", value_enum)]
    pub output_format: OutputFormat,

    /// Stop after this many events
    #[arg(short = 'n', long)]
    pub max_events: Option<usize>,

    /// Config file (default: <config_dir>/ssefetch/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Re-encoded as SSE text
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

pub async fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    match run_inner(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ssefetch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

async fn run_inner(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let request = build_request(&cli, &config)?;
    let token = request.cancel_token().clone();

    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let transport = ReqwestTransport::from_config(&config);
    let mut events = match http::stream(&transport, request).await {
        Ok(events) => events,
        Err(Error::Status(response)) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eprintln!("HTTP {status}");
            if !body.is_empty() {
                eprintln!("{body}");
            }
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    let mut count = 0;
    loop {
        // Also wake on Ctrl-C while the server is idle
        let next = tokio::select! {
            () = token.cancelled() => None,
            next = events.next_event() => next?,
        };
        let Some(event) = next else { break };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", format_event(&event, cli.output_format)?)?;
        stdout.flush()?;

        count += 1;
        if cli.max_events.is_some_and(|max| count >= max) {
            break;
        }
    }
    events.close();

    tracing::debug!(count, "Event stream finished");
    Ok(ExitCode::SUCCESS)
}

fn build_request(cli: &Cli, config: &Config) -> Result<Request> {
    let method = Method::from_bytes(cli.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method: {}", cli.method))?;

    let mut options = RequestOptions::new().method(method);
    for line in &cli.headers {
        let (name, value) = headers::parse_line(line)?;
        options = options.header(name, value);
    }
    config.merge_headers(&mut options.headers)?;

    if let Some(data) = &cli.data {
        options = options.body(read_body(data)?);
    }

    Ok(Request::new(cli.url.as_str(), options)?)
}

fn read_body(data: &str) -> Result<Vec<u8>> {
    if data == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = data.strip_prefix('@') {
        std::fs::read(path).with_context(|| format!("Failed to read body from {path}"))
    } else {
        Ok(data.as_bytes().to_vec())
    }
}

/// Render one event for output.
fn format_event(event: &Event, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(event)?);
    }

    let mut out = String::new();
    if let Some(id) = &event.id {
        out.push_str(&format!("id: {id}\n"));
    }
    if let Some(name) = &event.event {
        out.push_str(&format!("event: {name}\n"));
    }
    if let Some(retry) = event.retry {
        out.push_str(&format!("retry: {retry}\n"));
    }
    if let Some(data) = &event.data {
        for line in data.split('\n') {
            out.push_str(&format!("data: {line}\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::EventId;
    use reqwest::header::AUTHORIZATION;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ssefetch").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let cli = cli(&[
            "http://localhost/events",
            "-X",
            "post",
            "-H",
            "Authorization: Bearer t",
            "-d",
            "{}",
            "-o",
            "json",
        ]);
        assert_eq!(cli.url, "http://localhost/events");
        assert_eq!(cli.headers, vec!["Authorization: Bearer t"]);
        assert_eq!(cli.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_build_request() {
        let mut config = Config::default();
        config.headers.insert("X-Client".into(), "ssefetch".into());

        let cli = cli(&[
            "http://localhost/events",
            "-X",
            "post",
            "-H",
            "Authorization: Bearer t",
            "-d",
            "{\"stream\":true}",
        ]);
        let request = build_request(&cli, &config).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer t");
        assert_eq!(request.headers().get("x-client").unwrap(), "ssefetch");
        assert_eq!(request.body().unwrap().as_ref(), b"{\"stream\":true}");
    }

    #[test]
    fn test_build_request_rejects_bad_header() {
        let cli = cli(&["http://localhost/events", "-H", "missing-colon"]);
        assert!(build_request(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_format_text() {
        let event = Event {
            id: Some(EventId::Numeric(3.0)),
            event: Some("update".into()),
            data: Some("a\nb".into()),
            retry: Some(1000.0),
        };
        assert_eq!(
            format_event(&event, OutputFormat::Text).unwrap(),
            "id: 3\nevent: update\nretry: 1000\ndata: a\ndata: b\n"
        );
    }

    #[test]
    fn test_format_json() {
        let event = Event {
            id: Some(EventId::Text("m1".into())),
            ..Event::with_data("hello")
        };
        assert_eq!(
            format_event(&event, OutputFormat::Json).unwrap(),
            r#"{"id":"m1","data":"hello"}"#
        );
    }
}
