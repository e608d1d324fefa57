/// Subscription change route for completed purchases.
mod subscription;

use std::sync::Arc;

use aide::axum::{routing::post_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;

use crate::auth;

/// Create an [`ApiRouter`] that provides an API server with user management routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route(
            "/:id/subscription",
            post_with(subscription::subscribe, subscription::docs),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ))
        .with_path_items(|op| op.tag("Users"))
}
