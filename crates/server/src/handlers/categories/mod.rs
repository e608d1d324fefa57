/// Category creation route.
mod create;

/// Category list route.
mod list;

use std::sync::Arc;

use aide::axum::{
    routing::{get_with, post_with},
    ApiRouter,
};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Serialize;

use crate::auth;

/// A single category data.
#[derive(Serialize, JsonSchema)]
pub(crate) struct CategoryData {
    /// Category identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    /// Category name.
    #[schemars(example = "crate::schema::example_category_name")]
    pub name: String,

    /// URL-friendly category identifier.
    #[schemars(example = "crate::schema::example_category_slug")]
    pub slug: String,
}

impl From<db::category::Model> for CategoryData {
    fn from(model: db::category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}

/// Create an [`ApiRouter`] that provides an API server with category routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    let protected_routes = ApiRouter::new()
        .api_route("/", post_with(create::create, create::docs))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ));

    ApiRouter::new()
        .api_route("/", get_with(list::list, list::docs))
        .merge(protected_routes)
        .with_path_items(|op| op.tag("Categories"))
}
