use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde_json::Value;

use eventbrite_gateway::http::{ErrorBody, RelayedResponse, X_REQUEST_ID};
use eventbrite_gateway::upstream::model::{Event, EventPage};

#[derive(Parser)]
#[command(name = "events-cli")]
#[command(about = "Command line client for the Eventbrite gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Correlation id sent as x-request-id.
    #[arg(long)]
    request_id: Option<String>,

    /// Print one line per event instead of the raw relayed document.
    #[arg(short, long)]
    summary: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events
    List,
    /// Show one event
    Get { id: String },
    /// Create an event from the gateway's template
    Create,
    /// Update an event with the gateway's template
    Update { id: String },
    /// Cancel an event
    Cancel { id: String },
    /// Delete an event
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert(X_REQUEST_ID, HeaderValue::from_str(id)?);
    }

    let url = |segments: &[&str]| gateway_url(&cli.url, segments);
    let request = match &cli.command {
        Commands::List => client.get(url(&["events"])?),
        Commands::Get { id } => client.get(url(&["events", id.as_str()])?),
        Commands::Create => client.post(url(&["createEvent"])?),
        Commands::Update { id } => client.post(url(&["events", id.as_str()])?),
        Commands::Cancel { id } => client.post(url(&["events", id.as_str(), "cancel"])?),
        Commands::Delete { id } => client.delete(url(&["events", id.as_str()])?),
    };

    let res = request.headers(headers).send().await?;
    print_response(res, cli.summary).await
}

/// Append `segments` to the gateway base URL, percent-encoding each one.
fn gateway_url(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    if let Some(dot) = segments.iter().find(|s| **s == "." || **s == "..") {
        return Err(format!("'{}' cannot be sent as an event id", dot).into());
    }

    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("'{}' cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(
    res: reqwest::Response,
    summary: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(err) => eprintln!("{}", err.error),
            Err(_) => eprintln!("Response: {}", text),
        }
        return Ok(());
    }

    let relayed: RelayedResponse = serde_json::from_str(&text)?;
    println!("Upstream: {}", relayed.status);

    if summary {
        print_summary(&relayed.body);
        return Ok(());
    }

    // Pretty-print JSON bodies, pass anything else through.
    match serde_json::from_str::<Value>(&relayed.body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", relayed.body),
    }
    Ok(())
}

fn print_summary(body: &str) {
    if let Ok(page) = serde_json::from_str::<EventPage>(body) {
        if !page.events.is_empty() {
            for event in &page.events {
                println!("{}", event.summary_line());
            }
            return;
        }
    }
    match serde_json::from_str::<Event>(body) {
        Ok(event) => println!("{}", event.summary_line()),
        Err(_) => println!("{}", body),
    }
}
