/// Bookmark creation route.
mod add;

/// Bookmark list route.
mod list;

/// Bookmark removal route.
mod remove;

use std::sync::Arc;

use aide::axum::{routing::get_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::auth;

/// Bookmarked article reference.
#[derive(Deserialize, JsonSchema)]
pub(super) struct BookmarkRequest {
    /// Article identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    article_id: i64,
}

/// Create an [`ApiRouter`] that provides an API server with bookmark routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(list::list, list::docs)
                .post_with(add::add, add::docs)
                .delete_with(remove::remove, remove::docs),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
        .with_path_items(|op| op.tag("Bookmarks"))
}
