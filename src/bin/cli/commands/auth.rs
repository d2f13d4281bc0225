use clap::Subcommand;

use crate::client::MediashelfClient;
use crate::output::{self, OutputConfig};

/// Account commands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Create an account and print a session token
    Register {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        /// At least 8 characters
        #[clap(long, env = "MEDIASHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and print a session token
    Login {
        #[clap(long)]
        email: String,
        #[clap(long, env = "MEDIASHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the account the current token belongs to
    Me,
}

/// Executes an account command
pub async fn execute(
    client: &MediashelfClient,
    cmd: AuthCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        AuthCommands::Register { name, email, password } => {
            let auth = client.register(name, email, password).await?;
            output::print_token(&auth, config);
        }
        AuthCommands::Login { email, password } => {
            let auth = client.login(email, password).await?;
            output::print_token(&auth, config);
        }
        AuthCommands::Me => {
            let user = client.me().await?;
            output::print_user(&user, config);
        }
    }
    Ok(())
}
