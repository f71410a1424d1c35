use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use giftperch_gateway::affiliate::AffiliateLinkRewriter;
use giftperch_gateway::config::RuntimeMode;
use giftperch_gateway::preferences::{FileStore, PersistedFlags};

#[derive(Parser)]
#[command(name = "giftperch-cli")]
#[command(about = "Command-line client for the GiftPerch gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Access token for routes that act on behalf of a user.
    #[arg(short, long, env = "GIFTPERCH_TOKEN")]
    token: Option<String>,

    /// Local preference file used by `flag`.
    #[arg(long, env = "GIFTPERCH_PREFS", default_value = ".giftperch-prefs.json")]
    prefs: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Print the served robots.txt
    Robots,
    /// Search products
    Search {
        query: String,
        #[arg(long)]
        budget_min: Option<f64>,
        #[arg(long)]
        budget_max: Option<f64>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Set (or clear, with an empty name) the caller's display name
    SetName { display_name: String },
    /// Build an affiliate link locally, without contacting the gateway
    Link {
        #[arg(long)]
        product_url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, env = "AMAZON_PARTNER_TAG")]
        tag: Option<String>,
    },
    /// Read or write a local boolean preference
    Flag {
        key: String,
        /// Value to store; omit to read
        value: Option<bool>,
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Robots => {
            let res = client.get(format!("{}/robots.txt", cli.url)).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Search {
            query,
            budget_min,
            budget_max,
            max_results,
        } => {
            let body = json!({
                "query": query,
                "budgetMin": budget_min,
                "budgetMax": budget_max,
                "maxResults": max_results,
            });
            let res = client
                .post(format!("{}/api/amazon/search", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::SetName { display_name } => {
            let res = client
                .post(format!("{}/api/profile", cli.url))
                .headers(headers)
                .json(&json!({ "displayName": display_name }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Link {
            product_url,
            title,
            tag,
        } => {
            let rewriter = AffiliateLinkRewriter::new(tag, RuntimeMode::Production);
            println!("{}", rewriter.rewrite(product_url.as_deref(), title.as_deref()));
        }
        Commands::Flag {
            key,
            value,
            default,
        } => {
            let flags = PersistedFlags::new(Arc::new(FileStore::open(&cli.prefs)));
            if let Some(value) = value {
                flags.set(&key, value);
            }
            println!("{} = {}", key, flags.get(&key, default));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
