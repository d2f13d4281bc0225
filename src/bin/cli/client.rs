use mediashelf::dto::{
    AuthTokenDto, BulkImportDto, BulkImportResultDto, CreateTagsDto, CreateTypesDto, DashboardDto,
    DownloadDto, ListingFormDto, LoginDto, RegisterDto,
};
use mediashelf::models::{ListingDetails, ListingType, Tag, User};
use reqwest::{Client, Method, RequestBuilder};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Filters accepted by the listing index
#[derive(Debug, Default, Clone)]
pub struct ListingFilters {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub types: Vec<String>,
}

/// Builds query parameters, repeating the key for each tag and type
fn build_query_params(filters: &ListingFilters) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = Vec::new();

    if let Some(ref search) = filters.search {
        params.push(("search", search.clone()));
    }
    for tag in &filters.tags {
        params.push(("tags", tag.clone()));
    }
    for listing_type in &filters.types {
        params.push(("types", listing_type.clone()));
    }

    params
}

/// HTTP client wrapper for communicating with the mediashelf server
pub struct MediashelfClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// Session token sent as a bearer token, if any
    token: Option<String>,
    /// The underlying HTTP client
    client: Client,
}

impl MediashelfClient {
    /// Creates a new MediashelfClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the mediashelf server
    /// * `token` - A session token from `auth login`
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    /// Starts a request, attaching the session token when there is one
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        builder.send().await.map_err(ClientError::Request)?.check().await
    }

    // ── Account endpoints ────────────────────────────────────────────

    /// Creates an account and returns its first session token
    pub async fn register(&self, name: String, email: String, password: String) -> Result<AuthTokenDto, ClientError> {
        let dto = RegisterDto { name: Some(name), email: Some(email), password: Some(password) };
        let response = self.send(self.request(Method::POST, "/auth/register").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Logs in and returns a session token
    pub async fn login(&self, email: String, password: String) -> Result<AuthTokenDto, ClientError> {
        let dto = LoginDto { email, password };
        let response = self.send(self.request(Method::POST, "/auth/login").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets the signed-in user
    pub async fn me(&self) -> Result<User, ClientError> {
        let response = self.send(self.request(Method::GET, "/auth/me")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets the dashboard counts
    pub async fn dashboard(&self) -> Result<DashboardDto, ClientError> {
        let response = self.send(self.request(Method::GET, "/dashboard")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Listing endpoints ────────────────────────────────────────────

    /// Lists listings with optional filters
    pub async fn list_listings(&self, filters: &ListingFilters) -> Result<Vec<ListingDetails>, ClientError> {
        let params = build_query_params(filters);
        let response = self.send(self.request(Method::GET, "/listings").query(&params)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets a specific listing by ID
    pub async fn get_listing(&self, id: &str) -> Result<ListingDetails, ClientError> {
        let response = self.send(self.request(Method::GET, &format!("/listings/{}", id))).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates a listing
    pub async fn create_listing(&self, form: &ListingFormDto) -> Result<ListingDetails, ClientError> {
        let response = self.send(self.request(Method::POST, "/listings").json(form)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Replaces a listing's fields and tags
    pub async fn update_listing(&self, id: &str, form: &ListingFormDto) -> Result<ListingDetails, ClientError> {
        let response = self.send(self.request(Method::PUT, &format!("/listings/{}", id)).json(form)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a listing
    pub async fn delete_listing(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, &format!("/listings/{}", id))).await?;
        Ok(())
    }

    // ── Tag endpoints ────────────────────────────────────────────────

    /// Lists all tags
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        let response = self.send(self.request(Method::GET, "/tags")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates tags
    pub async fn create_tags(&self, tags: Vec<String>) -> Result<Vec<Tag>, ClientError> {
        let dto = CreateTagsDto { tags };
        let response = self.send(self.request(Method::POST, "/tags").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a tag
    pub async fn delete_tag(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, &format!("/tags/{}", id))).await?;
        Ok(())
    }

    // ── Type endpoints ───────────────────────────────────────────────

    /// Lists all types
    pub async fn list_types(&self) -> Result<Vec<ListingType>, ClientError> {
        let response = self.send(self.request(Method::GET, "/types")).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Creates types
    pub async fn create_types(&self, types: Vec<String>) -> Result<Vec<ListingType>, ClientError> {
        let dto = CreateTypesDto { types };
        let response = self.send(self.request(Method::POST, "/types").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a type
    pub async fn delete_type(&self, id: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, &format!("/types/{}", id))).await?;
        Ok(())
    }

    // ── Import / export ──────────────────────────────────────────────

    /// Submits a bulk import
    pub async fn import_listings(&self, listings_data: String) -> Result<BulkImportResultDto, ClientError> {
        let dto = BulkImportDto { listings_data: Some(listings_data) };
        let response = self.send(self.request(Method::POST, "/listings/bulk").json(&dto)).await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Downloads the export file and returns its text
    pub async fn download_listings(&self, fields: Option<Vec<String>>) -> Result<String, ClientError> {
        let dto = DownloadDto { fields };
        let response = self.send(self.request(Method::POST, "/listings/download").json(&dto)).await?;
        response.text().await.map_err(ClientError::Request)
    }
}
