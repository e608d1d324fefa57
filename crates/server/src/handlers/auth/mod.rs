/// User authentication route.
mod login;

/// Authentication token revocation route.
mod logout;

/// User registration route.
mod register;

use std::sync::Arc;

use aide::axum::{routing::post_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;

use crate::auth;

/// Create an [`ApiRouter`] that provides an API server with authentication routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    let protected_routes = ApiRouter::new()
        .api_route("/logout", post_with(logout::logout, logout::docs))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ));

    ApiRouter::new()
        .api_route("/login", post_with(login::login, login::docs))
        .api_route("/register", post_with(register::register, register::docs))
        .merge(protected_routes)
        .with_path_items(|op| op.tag("Authentication"))
}
