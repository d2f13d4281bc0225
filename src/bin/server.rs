use clap::Parser;
use mediashelf::auth::{self, AuthSettings};
use mediashelf::config::{self, CliArgs, Config};
use mediashelf::{create_app, db, run_migrations, seed, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sets up stdout logging plus a daily JSON log file in `log_dir`
///
/// The returned guard flushes the file writer when dropped, so it has to
/// live as long as the server.
fn init_tracing(config: &Config, debug: bool) -> WorkerGuard {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "mediashelf.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().json().with_writer(file_writer))
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env before clap reads them
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let (debug, run_seed) = (args.debug, args.seed);
    let config = config::get_config(args);

    let _guard = init_tracing(&config, debug);
    info!("Starting mediashelf {}", env!("CARGO_PKG_VERSION"));
    info!("Using database at {}", config.database_url);

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(db::init_pool(&config.database_url)?);
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }

    let jwt_secret = match config.jwt_secret.clone() {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            warn!("No JWT secret configured; generated one for this run, sessions will not survive a restart");
            auth::generate_secret()
        }
    };
    let auth = Arc::new(AuthSettings::new(jwt_secret, config.token_ttl(), config.bcrypt_cost));

    if run_seed {
        let outcome = seed::seed(&pool, &auth).await?;
        info!("Seed finished: {:?}", outcome);
    }

    let app = create_app(AppState::new(pool, auth));

    let addr = config.bind_address();
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
