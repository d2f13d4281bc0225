use clap::Subcommand;

use crate::client::MediashelfClient;
use crate::output::{self, OutputConfig};

/// Type management commands
#[derive(Subcommand, Debug)]
pub enum TypeCommands {
    /// List your types
    List,
    /// Create one or more types
    Create {
        /// Names of the types
        #[clap(required = true)]
        names: Vec<String>,
    },
    /// Delete a type that no listing uses
    Delete {
        /// The type ID
        id: String,
    },
}

/// Executes a type command
pub async fn execute(
    client: &MediashelfClient,
    cmd: TypeCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TypeCommands::List => {
            let types = client.list_types().await?;
            output::print_types(&types, config);
        }
        TypeCommands::Create { names } => {
            let types = client.create_types(names).await?;
            output::print_types(&types, config);
        }
        TypeCommands::Delete { id } => {
            client.delete_type(&id).await?;
            output::print_success(&format!("Deleted type {}", id), config);
        }
    }
    Ok(())
}
