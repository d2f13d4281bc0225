mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::MediashelfClient;
use mediashelf::config;
use output::{OutputConfig, OutputFormat};
use std::path::PathBuf;
use std::process;

/// CLI for the mediashelf listing manager
#[derive(Parser, Debug)]
#[clap(name = "mediashelf-cli", about = "CLI for the mediashelf listing manager")]
struct Cli {
    /// Server URL to connect to
    #[clap(
        long,
        env = "MEDIASHELF_URL",
        global = true
    )]
    server_url: Option<String>,

    /// Session token from `auth login`
    #[clap(long, env = "MEDIASHELF_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register, log in, or show the current account
    #[command(subcommand)]
    Auth(commands::auth::AuthCommands),
    /// Show how many listings, tags and types you have
    Dashboard,
    /// Manage listings
    #[command(subcommand)]
    Listing(commands::listing::ListingCommands),
    /// Manage tags
    #[command(subcommand)]
    Tag(commands::tag::TagCommands),
    /// Manage types
    #[command(subcommand)]
    Type(commands::listing_type::TypeCommands),
    /// Import listings from a JSON file
    Import {
        /// Path to a file holding a JSON array of listings
        file: PathBuf,
    },
    /// Download listings as JSON
    Export {
        /// Field to include; repeat for several. Defaults to all but the timestamps
        #[clap(long = "field")]
        fields: Vec<String>,
        /// Write to this file instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default (port based on debug/release)
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    // Try reading from config file
    if let Some(dir) = config::get_config_dir_path() {
        let config_path = dir.join("config.toml");
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    format!("http://localhost:{}", config::default_port())
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is mediashelf running?\n  {}",
            err_string
        );
    }

    if err_string.contains("Server error (401)") {
        return format!("{}\n  Log in with `mediashelf-cli auth login` and set MEDIASHELF_TOKEN.", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = MediashelfClient::new(server_url, cli.token);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(&client, cmd, &output_config).await,
        Commands::Dashboard => match client.dashboard().await {
            Ok(counts) => {
                output::print_dashboard(&counts, &output_config);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Commands::Listing(cmd) => commands::listing::execute(&client, cmd, &output_config).await,
        Commands::Tag(cmd) => commands::tag::execute(&client, cmd, &output_config).await,
        Commands::Type(cmd) => commands::listing_type::execute(&client, cmd, &output_config).await,
        Commands::Import { file } => commands::transfer::import(&client, file, &output_config).await,
        Commands::Export { fields, output: destination } => {
            commands::transfer::export(&client, fields, destination, &output_config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
