use clap::{Parser, Subcommand};
use serde_json::Value;

use sentinel_flow::http::FlowRequest;

#[derive(Parser)]
#[command(name = "flow-cli")]
#[command(about = "Command-line client for the sentinel-flow service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace fund movement from one address to another
    Trace {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// ethereum, arbitrum, base, optimism, polygon or bsc
        #[arg(long, default_value = "ethereum")]
        chain: String,
        /// Hop budget (clamped to 1..=5 by the service)
        #[arg(long)]
        max_hops: Option<i64>,
    },
    /// Show recently completed traces
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Trace {
            from,
            to,
            chain,
            max_hops,
        } => {
            let request = FlowRequest {
                from: Some(from),
                to: Some(to),
                chain: Some(chain),
                max_hops: max_hops.map(|hops| hops as f64),
            };
            client
                .post(format!("{}/api/trace/flow", base))
                .json(&request)
                .send()
                .await?
        }
        Commands::Recent { limit } => {
            client
                .get(format!("{}/api/trace/recent", base))
                .query(&[("limit", limit)])
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: service returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
