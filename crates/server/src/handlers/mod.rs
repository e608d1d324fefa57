/// Article feed, article view and article management routes.
pub(crate) mod articles;

/// Authentication-related routes.
pub(crate) mod auth;

/// Bookmark management routes.
pub(crate) mod bookmarks;

/// Category routes.
pub(crate) mod categories;

/// API documentation routes.
pub(crate) mod docs;

/// Followed writer management routes.
pub(crate) mod following;

/// Current user profile and subscription routes.
pub(crate) mod me;

/// Subscription plan catalog routes.
pub(crate) mod plans;

/// User management routes.
pub(crate) mod users;
