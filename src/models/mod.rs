/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, as well as the
/// composite views the handlers return.

mod user;
pub use user::User;

mod listing_type;
pub use listing_type::ListingType;

mod tag;
pub use tag::Tag;

mod listing;
pub use listing::Listing;

mod listing_tag;
pub use listing_tag::ListingTag;

mod listing_details;
pub use listing_details::ListingDetails;
