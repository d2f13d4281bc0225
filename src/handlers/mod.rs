/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, calling the appropriate repository functions,
/// and returning a properly formatted response.
///
/// Every handler except the welcome page and the auth entry points takes an
/// [`AuthUser`](crate::auth::AuthUser) and only ever touches that user's data.

mod auth_handlers;
mod home_handlers;
mod listing_handlers;
mod bulk_handlers;
mod export_handlers;
mod tag_handlers;
mod type_handlers;

// Re-export all handlers
pub use auth_handlers::*;
pub use home_handlers::*;
pub use listing_handlers::*;
pub use bulk_handlers::*;
pub use export_handlers::*;
pub use tag_handlers::*;
pub use type_handlers::*;
