pub mod auth;
pub mod listing;
pub mod listing_type;
pub mod tag;
pub mod transfer;
