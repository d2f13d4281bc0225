use clap::ValueEnum;
use mediashelf::dto::{AuthTokenDto, BulkImportResultDto, DashboardDto};
use mediashelf::models::{ListingDetails, ListingType, Tag, User};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: could not render JSON: {}", e),
    }
}

/// Prints a user in the specified format
pub fn print_user(user: &User, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", user.get_id());
                return;
            }
            println!("ID:      {}", user.get_id());
            println!("Name:    {}", user.get_name());
            println!("Email:   {}", user.get_email());
            println!("Created: {}", user.get_created_at());
        }
        OutputFormat::Json => print_json(user),
    }
}

/// Prints a freshly issued session token
pub fn print_token(auth: &AuthTokenDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", auth.token);
                return;
            }
            println!("Signed in as {} <{}>", auth.user.get_name(), auth.user.get_email());
            println!("Token expires in {} seconds. Use it with:", auth.expires_in);
            println!("  export MEDIASHELF_TOKEN={}", auth.token);
        }
        OutputFormat::Json => print_json(auth),
    }
}

/// Prints a list of listings in the specified format
pub fn print_listings(listings: &[ListingDetails], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if listings.is_empty() {
                if !config.quiet {
                    println!("No listings found.");
                }
                return;
            }
            if config.quiet {
                for l in listings {
                    println!("{}", l.listing.get_id());
                }
                return;
            }
            let max_id = listings.iter().map(|l| l.listing.get_id().len()).max().unwrap_or(2);
            let max_name = listings
                .iter()
                .map(|l| l.listing.get_name().chars().count())
                .max()
                .unwrap_or(4)
                .max(4);
            let max_type = listings
                .iter()
                .map(|l| l.type_name().map(|n| n.chars().count()).unwrap_or(1))
                .max()
                .unwrap_or(4)
                .max(4);
            println!(
                "{:<id_w$}  {:<name_w$}  {:<type_w$}  TAGS",
                "ID",
                "NAME",
                "TYPE",
                id_w = max_id,
                name_w = max_name,
                type_w = max_type,
            );
            for l in listings {
                println!(
                    "{:<id_w$}  {:<name_w$}  {:<type_w$}  {}",
                    l.listing.get_id(),
                    l.listing.get_name(),
                    l.type_name().unwrap_or_else(|| "-".to_string()),
                    l.tag_names().join(", "),
                    id_w = max_id,
                    name_w = max_name,
                    type_w = max_type,
                );
            }
        }
        OutputFormat::Json => print_json(listings),
    }
}

/// Prints a single listing in the specified format
pub fn print_listing(details: &ListingDetails, config: &OutputConfig) {
    let listing = &details.listing;
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", listing.get_id());
                return;
            }
            let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            println!("ID:          {}", listing.get_id());
            println!("Name:        {}", listing.get_name());
            println!("Type:        {}", or_dash(details.type_name()));
            println!("Tags:        {}", details.tag_names().join(", "));
            println!("Author:      {}", or_dash(listing.get_author()));
            println!("Description: {}", or_dash(listing.get_description()));
            println!("Image URL:   {}", or_dash(listing.get_image_url()));
            println!("Link:        {}", or_dash(listing.get_link()));
            println!("Created:     {}", listing.get_created_at());
            println!("Updated:     {}", listing.get_updated_at());
        }
        OutputFormat::Json => print_json(details),
    }
}

/// Prints a list of tags in the specified format
pub fn print_tags(tags: &[Tag], config: &OutputConfig) {
    let rows: Vec<(String, String)> = tags.iter().map(|t| (t.get_id(), t.get_name())).collect();
    match config.format {
        OutputFormat::Human => print_labels(&rows, "tags", config),
        OutputFormat::Json => print_json(tags),
    }
}

/// Prints a list of types in the specified format
pub fn print_types(types: &[ListingType], config: &OutputConfig) {
    let rows: Vec<(String, String)> = types.iter().map(|t| (t.get_id(), t.get_name())).collect();
    match config.format {
        OutputFormat::Human => print_labels(&rows, "types", config),
        OutputFormat::Json => print_json(types),
    }
}

/// ID/name table shared by tags and types
fn print_labels(rows: &[(String, String)], noun: &str, config: &OutputConfig) {
    if rows.is_empty() {
        if !config.quiet {
            println!("No {} found.", noun);
        }
        return;
    }
    if config.quiet {
        for (id, _) in rows {
            println!("{}", id);
        }
        return;
    }
    let max_id = rows.iter().map(|(id, _)| id.len()).max().unwrap_or(2);
    println!("{:<width$}  NAME", "ID", width = max_id);
    for (id, name) in rows {
        println!("{:<width$}  {}", id, name, width = max_id);
    }
}

/// Prints the dashboard counts
pub fn print_dashboard(counts: &DashboardDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{} {} {}", counts.listings, counts.tags, counts.types);
                return;
            }
            println!("Listings: {}", counts.listings);
            println!("Tags:     {}", counts.tags);
            println!("Types:    {}", counts.types);
        }
        OutputFormat::Json => print_json(counts),
    }
}

/// Prints the outcome of a bulk import
pub fn print_import_result(result: &BulkImportResultDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", result.created);
            } else {
                println!("{} ({} created)", result.message, result.created);
            }
        }
        OutputFormat::Json => print_json(result),
    }
}

/// Prints a success message, or `{"ok": true}` in JSON mode
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({ "ok": true, "message": message })),
    }
}
