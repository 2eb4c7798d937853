use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use layer_console::config::load_config;
use layer_console::lifecycle::prepare;

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Inspection CLI for the layered console dev server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check dev server status
    Status,
    /// Dump the composed route tree
    Routes,
    /// List proxy rules and their current targets
    Proxy,
    /// Show how the server would handle a path
    Resolve { path: String },
    /// Validate a configuration file offline
    Check { config: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { config } => return check(&config),
        Commands::Status => fetch(&cli.url, "/__console/status", &[]).await,
        Commands::Routes => fetch(&cli.url, "/__console/routes", &[]).await,
        Commands::Proxy => fetch(&cli.url, "/__console/proxy", &[]).await,
        Commands::Resolve { path } => {
            fetch(&cli.url, "/__console/resolve", &[("path", path.as_str())]).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path) -> ExitCode {
    let outcome = load_config(path)
        .map_err(|e| e.to_string())
        .and_then(|config| prepare(config).map_err(|e| e.to_string()));

    match outcome {
        Ok(console) => {
            println!(
                "OK: {} layers, {} pages, {} proxy rules",
                console.tree.layers().count(),
                console.pages.len(),
                console.proxy.rules().len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn fetch(
    base: &str,
    endpoint: &str,
    query: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    let res = reqwest::Client::new()
        .get(format!("{}{}", base.trim_end_matches('/'), endpoint))
        .query(query)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("console returned status {}: {}", status, text).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
