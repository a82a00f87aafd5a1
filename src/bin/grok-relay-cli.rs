use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grok-relay-cli")]
#[command(about = "Account management CLI for the Grok relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save or replace one account
    Save {
        #[arg(long)]
        id: String,
        #[arg(long)]
        cookie: String,
    },
    /// Merge accounts from a JSON file ({"accounts": [...]} or a bare array)
    Sync {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List accounts held by the relay
    List,
}

fn read_accounts(path: &PathBuf) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("accounts").unwrap_or_else(|| json!([])),
        _ => return Err("expected an array or an object with an `accounts` field".into()),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Save { id, cookie } => {
            let res = client
                .post(format!("{}/api/account", base))
                .json(&json!({ "id": id, "cookie": cookie }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Sync { file } => {
            let accounts = match &file {
                Some(path) => read_accounts(path)?,
                None => json!([]),
            };
            let res = client
                .post(format!("{}/api/sync", base))
                .json(&json!({ "accounts": accounts }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::List => {
            let res = client
                .post(format!("{}/api/sync", base))
                .json(&json!({ "accounts": [] }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
