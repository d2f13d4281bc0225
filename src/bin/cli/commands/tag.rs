use clap::Subcommand;

use crate::client::MediashelfClient;
use crate::output::{self, OutputConfig};

/// Tag management commands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List your tags
    List,
    /// Create one or more tags
    Create {
        /// Names of the tags
        #[clap(required = true)]
        names: Vec<String>,
    },
    /// Delete a tag and detach it from every listing
    Delete {
        /// The tag ID
        id: String,
    },
}

/// Executes a tag command
pub async fn execute(
    client: &MediashelfClient,
    cmd: TagCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TagCommands::List => {
            let tags = client.list_tags().await?;
            output::print_tags(&tags, config);
        }
        TagCommands::Create { names } => {
            let tags = client.create_tags(names).await?;
            output::print_tags(&tags, config);
        }
        TagCommands::Delete { id } => {
            client.delete_tag(&id).await?;
            output::print_success(&format!("Deleted tag {}", id), config);
        }
    }
    Ok(())
}
