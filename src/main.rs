use clap::Parser;
use pawsearch::config::{LoggingSettings, Settings};
use pawsearch::services::ApiClient;
use pawsearch::shell::{self, Command};
use pawsearch::SearchSession;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Search adoptable dogs from the terminal
#[derive(Debug, Parser)]
#[command(name = "pawsearch", version, about)]
struct Cli {
    /// Settings file (defaults to config/default + config/local)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let mut settings = match loaded {
        Ok(settings) => {
            init_logging(&settings.logging);
            settings
        }
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }

    let api = ApiClient::new(settings.api.base_url.clone(), settings.api.timeout())
        .map_err(std::io::Error::other)?;

    info!("Using API at {}", api.base_url());

    let mut session = SearchSession::new(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Pawsearch. Type 'help' for commands.");
    prompt();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            prompt();
            continue;
        }

        match shell::parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => println!("{}", shell::dispatch(&mut session, command).await),
            Err(e) => println!("{}", e),
        }
        prompt();
    }

    if session.is_authenticated() {
        session.logout().await;
    }

    Ok(())
}
