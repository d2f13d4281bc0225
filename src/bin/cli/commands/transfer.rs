use std::fs;
use std::path::PathBuf;

use crate::client::MediashelfClient;
use crate::output::{self, OutputConfig};

/// Imports listings from a JSON file
///
/// The file holds the same array the bulk import page accepts.
pub async fn import(
    client: &MediashelfClient,
    file: PathBuf,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&file)?;
    let result = client.import_listings(text).await?;
    output::print_import_result(&result, config);
    Ok(())
}

/// Downloads an export, to `output` or stdout
pub async fn export(
    client: &MediashelfClient,
    fields: Vec<String>,
    destination: Option<PathBuf>,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let fields = if fields.is_empty() { None } else { Some(fields) };
    let body = client.download_listings(fields).await?;

    match destination {
        Some(path) => {
            fs::write(&path, body)?;
            output::print_success(&format!("Wrote export to {}", path.display()), config);
        }
        None => println!("{}", body),
    }
    Ok(())
}
