use clap::{Args, Subcommand};
use mediashelf::dto::ListingFormDto;

use crate::client::{ListingFilters, MediashelfClient};
use crate::output::{self, OutputConfig};

/// The fields of a listing form
#[derive(Args, Debug)]
pub struct ListingFields {
    /// Title of the entry
    #[clap(long)]
    name: String,
    /// ID of the type (see `type list`)
    #[clap(long)]
    type_id: String,
    #[clap(long)]
    description: Option<String>,
    #[clap(long)]
    author: Option<String>,
    #[clap(long)]
    image_url: Option<String>,
    #[clap(long)]
    link: Option<String>,
    /// Tag ID to attach; repeat for several
    #[clap(long = "tag")]
    tags: Vec<String>,
}

impl From<ListingFields> for ListingFormDto {
    fn from(fields: ListingFields) -> Self {
        ListingFormDto {
            name: Some(fields.name),
            description: fields.description,
            author: fields.author,
            type_id: Some(fields.type_id),
            image_url: fields.image_url,
            link: fields.link,
            tags: Some(fields.tags),
        }
    }
}

/// Listing management commands
#[derive(Subcommand, Debug)]
pub enum ListingCommands {
    /// List your listings, newest first
    List {
        /// Case-insensitive substring of the name
        #[clap(long)]
        search: Option<String>,
        /// Keep listings with this tag name; repeat for any of several
        #[clap(long = "tag")]
        tags: Vec<String>,
        /// Keep listings of this type name; repeat for any of several
        #[clap(long = "type")]
        types: Vec<String>,
    },
    /// Show a listing
    Show {
        /// The listing ID
        id: String,
    },
    /// Create a listing
    Create(ListingFields),
    /// Replace a listing's fields and tags
    Update {
        /// The listing ID
        id: String,
        #[clap(flatten)]
        fields: ListingFields,
    },
    /// Delete a listing
    Delete {
        /// The listing ID
        id: String,
    },
}

/// Executes a listing command
pub async fn execute(
    client: &MediashelfClient,
    cmd: ListingCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ListingCommands::List { search, tags, types } => {
            let filters = ListingFilters { search, tags, types };
            let listings = client.list_listings(&filters).await?;
            output::print_listings(&listings, config);
        }
        ListingCommands::Show { id } => {
            let listing = client.get_listing(&id).await?;
            output::print_listing(&listing, config);
        }
        ListingCommands::Create(fields) => {
            let listing = client.create_listing(&fields.into()).await?;
            output::print_listing(&listing, config);
        }
        ListingCommands::Update { id, fields } => {
            let listing = client.update_listing(&id, &fields.into()).await?;
            output::print_listing(&listing, config);
        }
        ListingCommands::Delete { id } => {
            client.delete_listing(&id).await?;
            output::print_success(&format!("Deleted listing {}", id), config);
        }
    }
    Ok(())
}
