//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `url_reputation` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing results as JSON
//!
//! All core functionality is implemented in the library crate.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use url_reputation::config::{
    DEFAULT_ARCHIVE_ENDPOINT, DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_RDAP_ENDPOINT, DEFAULT_SERVER_PORT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use url_reputation::initialization::{init_crypto_provider, init_logger_with};
use url_reputation::server::{start_server, AppState};
use url_reputation::{
    extract_links, Config, ContentHint, Evaluator, LinkCheckReport, LogFormat, LogLevel,
};

/// Scores the trustworthiness of URLs.
#[derive(Debug, Parser)]
#[command(name = "url-reputation", version, about)]
struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value = "plain", global = true)]
    log_format: LogFormat,

    /// Probe timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_seconds: u64,

    /// Registration and archive lookup timeout in seconds
    #[arg(long, default_value_t = DEFAULT_LOOKUP_TIMEOUT_SECS, global = true)]
    lookup_timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    user_agent: String,

    /// Maximum concurrent evaluations within a batch
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY, global = true)]
    max_concurrency: usize,

    /// Redis cache address; without it results are cached in process
    #[arg(long, env = "REDIS_URL", global = true)]
    redis_url: Option<String>,

    /// RDAP base URL; the domain is appended
    #[arg(long, default_value = DEFAULT_RDAP_ENDPOINT, global = true)]
    rdap_endpoint: String,

    /// Wayback CDX endpoint
    #[arg(long, default_value = DEFAULT_ARCHIVE_ENDPOINT, global = true)]
    archive_endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
    /// Evaluate URLs and print the outcomes
    Check {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Extract links from a file (or `-` for stdin) and evaluate them
    Extract {
        file: PathBuf,
        #[arg(long, default_value = "auto")]
        content_type: ContentHint,
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print the registration and archive history of a domain
    History { domain: String },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            timeout_seconds: self.timeout_seconds,
            lookup_timeout_seconds: self.lookup_timeout_seconds,
            user_agent: self.user_agent.clone(),
            max_concurrency: self.max_concurrency,
            redis_url: self.redis_url.clone(),
            rdap_endpoint: self.rdap_endpoint.clone(),
            archive_endpoint: self.archive_endpoint.clone(),
            ..Config::default()
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

fn read_content(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read content from stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read content from {}", file.display()))
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    let evaluator = Evaluator::from_config(&config)
        .await
        .context("Failed to initialize evaluator")?;

    match cli.command {
        Command::Serve { port } => {
            let state = AppState::new(evaluator, config.history_capacity, config.max_concurrency);
            start_server(port, state).await
        }
        Command::Check { urls } => print_json(&evaluator.evaluate_batch(&urls).await),
        Command::Extract {
            file,
            content_type,
            base_url,
        } => {
            let content = read_content(&file)?;
            let links = extract_links(&content, content_type, base_url.as_deref());
            let outcomes = evaluator.evaluate_batch(&links).await;
            print_json(&LinkCheckReport::from_outcomes(links, outcomes))
        }
        Command::History { domain } => print_json(&evaluator.domain_history(&domain).await),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    if let Err(e) = run(cli).await {
        eprintln!("url-reputation error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
