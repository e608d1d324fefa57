/// Article creation route.
mod create;

/// Published article feed route.
mod list;

/// Publication status change route.
mod status;

/// Article editing route.
mod update;

/// Entitlement-gated article view route.
mod view;

use std::sync::Arc;

use aide::axum::{
    routing::{get_with, post_with, put_with},
    ApiRouter,
};
use axum::middleware::from_fn_with_state;
use db::{article, DatabaseConnection, PrimitiveDateTime};
use schemars::JsonSchema;
use serde::Serialize;

use crate::auth::{self, AuthenticatedUser};

/// Full article data, as seen by staff members.
#[derive(Serialize, JsonSchema)]
pub(crate) struct ArticleData {
    /// Article identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    /// Author's user identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub author_id: i64,

    /// Category identifier, if the article was categorized.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub category_id: Option<i64>,

    /// URL-friendly article identifier.
    #[schemars(example = "crate::schema::example_slug")]
    pub slug: String,

    /// Article title.
    #[schemars(example = "crate::schema::example_title")]
    pub title: String,

    /// Short description shown in feeds.
    #[schemars(example = "crate::schema::example_excerpt")]
    pub excerpt: String,

    /// Article content.
    #[schemars(example = "crate::schema::example_content")]
    pub content: String,

    /// Publication status.
    #[schemars(example = "crate::schema::example_article_status")]
    pub status: article::Status,

    /// Scheduled publication time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub scheduled_at: Option<i64>,

    /// Publication time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub published_at: Option<i64>,

    /// Last modification time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    pub updated_at: i64,
}

impl From<article::Model> for ArticleData {
    fn from(model: article::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            category_id: model.category_id,
            slug: model.slug,
            title: model.title,
            excerpt: model.excerpt,
            content: model.content,
            status: model.status,
            scheduled_at: model.scheduled_at.map(unix_timestamp),
            published_at: model.published_at.map(unix_timestamp),
            updated_at: unix_timestamp(model.updated_at),
        }
    }
}

/// Convert a stored UTC timestamp into a UNIX timestamp.
pub(crate) fn unix_timestamp(at: PrimitiveDateTime) -> i64 {
    at.assume_utc().unix_timestamp()
}

/// Check whether the user may modify the provided article.
///
/// Administrators may edit any article, editors only their own ones.
fn can_modify(user: &AuthenticatedUser, article: &article::Model) -> bool {
    match user.role() {
        entitlement::Role::Admin => true,
        entitlement::Role::Editor => article.author_id == user.id(),
        _ => false,
    }
}

/// Create an [`ApiRouter`] that provides an API server with article routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    let reader_routes = ApiRouter::new()
        .api_route("/:slug", get_with(view::view, view::docs))
        .route_layer(from_fn_with_state(
            database.clone(),
            auth::identify_reader::<_>,
        ));

    let staff_routes = ApiRouter::new()
        .api_route("/", post_with(create::create, create::docs))
        .api_route("/:slug", put_with(update::update, update::docs))
        .api_route("/:slug/status", post_with(status::status, status::docs))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ));

    ApiRouter::new()
        .api_route("/", get_with(list::list, list::docs))
        .merge(reader_routes)
        .merge(staff_routes)
        .with_path_items(|op| op.tag("Articles"))
}
