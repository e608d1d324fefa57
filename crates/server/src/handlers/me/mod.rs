/// Current user profile route.
mod profile;

/// Subscription tier change route.
pub(crate) mod subscription;

use std::sync::Arc;

use aide::axum::{
    routing::{get_with, post_with},
    ApiRouter,
};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;

use crate::auth;

/// Create an [`ApiRouter`] that provides an API server with current user routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/", get_with(profile::profile, profile::docs))
        .api_route(
            "/subscription",
            post_with(subscription::subscribe, subscription::docs),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
        .with_path_items(|op| op.tag("Current user"))
}
