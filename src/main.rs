use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use destina::config::{DestinaConfig, GEMINI_API_KEY_VAR};
use destina::render::terminal;
use destina::{DestinaError, TravelGuide, logging, web};

/// Destina - AI travel companion with city summaries and map links
#[derive(Parser)]
#[command(name = "destina", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging and print configuration details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a city and print its description and recommendations
    Lookup {
        /// City name, e.g. "Paris"
        city: String,
    },

    /// Serve the interactive web page
    Serve {
        /// Port to listen on (defaults to server.port from config)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<DestinaError>() {
            Some(err) => {
                eprintln!("Error: {err}");
                eprintln!("{}", err.user_message());
            }
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        verbose,
        command,
    } = cli;

    let config = DestinaConfig::load_from_path(config_path.clone())?;
    logging::init(&config.logging, verbose)?;

    match command {
        Some(Command::Lookup { city }) => {
            let guide = TravelGuide::from_config(&config)?;
            let page = guide.lookup(&city).await;
            let mut stdout = io::stdout().lock();
            terminal::write_page(&mut stdout, &page).context("Failed to write output")?;
            stdout.flush()?;
        }
        Some(Command::Serve { port }) => {
            let guide = TravelGuide::from_config(&config)?;
            web::run(guide, port.unwrap_or(config.server.port)).await?;
        }
        None => print_overview(config_path, verbose, &config),
    }

    Ok(())
}

fn print_overview(config_path: Option<PathBuf>, verbose: bool, config: &DestinaConfig) {
    println!("🌍 Destina v{} - AI travel companion", destina::VERSION);
    println!();
    println!("  destina lookup <CITY>    print a city guide");
    println!("  destina serve            start the web page on port {}", config.server.port);
    println!();

    if config.gemini.api_key.is_none() {
        println!("Set {GEMINI_API_KEY_VAR} (or add it to .env) to enable recommendations.");
    }

    if verbose {
        let config_path = config_path
            .or_else(DestinaConfig::get_config_path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());
        println!("Using config from: {config_path}");
        println!("Gemini model: {}", config.gemini.model);
        println!("Wikipedia endpoint: {}", config.wikipedia.base_url);
        println!("Log level: {}", config.logging.level);
    }
}
