/// Writer follow route.
mod follow;

/// Followed writers list route.
mod list;

/// Writer unfollow route.
mod unfollow;

use std::sync::Arc;

use aide::axum::{routing::get_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::auth;

/// Followed writer reference.
#[derive(Deserialize, JsonSchema)]
pub(super) struct FollowRequest {
    /// Writer's user identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    author_id: i64,
}

/// Create an [`ApiRouter`] that provides an API server with followed writer routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route(
            "/",
            get_with(list::list, list::docs)
                .post_with(follow::follow, follow::docs)
                .delete_with(unfollow::unfollow, unfollow::docs),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
        .with_path_items(|op| op.tag("Following"))
}
