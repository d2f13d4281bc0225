use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

/// Configuration for the mediashelf server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Interface the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Secret used to sign session tokens; generated per run when unset
    pub jwt_secret: Option<String>,
    /// Lifetime of a session token in minutes
    pub token_ttl_minutes: u64,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Directory for the rolling JSON log files
    pub log_dir: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub token_ttl_minutes: Option<u64>,
    #[serde(default)]
    pub bcrypt_cost: Option<u32>,
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Server URL used by the CLI; the server ignores it
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "mediashelf", about = "A personal media-listing manager")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Interface to bind to
    #[clap(long, env = "MEDIASHELF_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "MEDIASHELF_PORT")]
    pub port: Option<u16>,

    /// Secret used to sign session tokens
    #[clap(long, env = "MEDIASHELF_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Session token lifetime in minutes
    #[clap(long, env = "MEDIASHELF_TOKEN_TTL_MINUTES")]
    pub token_ttl_minutes: Option<u64>,

    /// bcrypt cost for password hashes
    #[clap(long, env = "MEDIASHELF_BCRYPT_COST")]
    pub bcrypt_cost: Option<u32>,

    /// Directory for log files
    #[clap(long, env = "MEDIASHELF_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Debug mode
    #[clap(long, env = "MEDIASHELF_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Seed the demo user and sample data, then start serving
    #[clap(long, default_value_t = false)]
    pub seed: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            jwt_secret: update.jwt_secret.or(self.jwt_secret),
            token_ttl_minutes: update.token_ttl_minutes.unwrap_or(self.token_ttl_minutes),
            bcrypt_cost: update.bcrypt_cost.unwrap_or(self.bcrypt_cost),
            log_dir: update.log_dir.unwrap_or(self.log_dir),
        }
    }

    /// Returns the session token lifetime as a Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_minutes.saturating_mul(60))
    }

    /// Returns the `host:port` pair to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The port used when none is configured
///
/// Debug builds default to 3001 so a development server can run next to
/// an installed one.
pub fn default_port() -> u16 {
    if cfg!(debug_assertions) { 3001 } else { 3000 }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let in_config_dir = |name: &str| {
        config_path
            .as_ref()
            .map_or(name.to_string(), |path| path.join(name).to_string_lossy().to_string())
    };

    Config {
        database_url: in_config_dir("mediashelf.db"),
        host: "127.0.0.1".to_string(),
        port: default_port(),
        jwt_secret: None,
        token_ttl_minutes: 60 * 24,
        bcrypt_cost: bcrypt::DEFAULT_COST,
        log_dir: in_config_dir("logs"),
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        host: args.host,
        port: args.port,
        jwt_secret: args.jwt_secret,
        token_ttl_minutes: args.token_ttl_minutes,
        bcrypt_cost: args.bcrypt_cost,
        log_dir: args.log_dir,
        server_url: None,
    }
}

/// Returns the XDG config directory for mediashelf, if one can be determined
pub fn get_config_dir_path() -> Option<PathBuf> {
    match ProjectDirs::from("com", "mediashelf", "mediashelf") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().to_path_buf()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config_path = get_config_dir_path().and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_path.clone());
    let file_path = config_path.map(|path| path.join("config.toml"));

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(file_path).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind={}, token_ttl={}min, log_dir={}",
        config.database_url,
        config.bind_address(),
        config.token_ttl_minutes,
        config.log_dir
    );

    config
}

#[cfg(test)]
mod tests;
