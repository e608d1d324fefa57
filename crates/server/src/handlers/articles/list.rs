use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    article, category, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, OffsetDateTime,
    QueryFilter, QueryOrder, QuerySelect,
};
use derive_more::{Display, Error, From};
use futures_util::TryStreamExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::unix_timestamp;
use crate::pagination::Pagination;

/// Published article summary, shown in feeds.
#[derive(Serialize, JsonSchema)]
pub(super) struct ArticleSummary {
    /// Article identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Author's user identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    author_id: i64,

    /// Category identifier, if the article was categorized.
    #[schemars(example = "crate::schema::example_database_identifier")]
    category_id: Option<i64>,

    /// URL-friendly article identifier.
    #[schemars(example = "crate::schema::example_slug")]
    slug: String,

    /// Article title.
    #[schemars(example = "crate::schema::example_title")]
    title: String,

    /// Short description of the article.
    #[schemars(example = "crate::schema::example_excerpt")]
    excerpt: String,

    /// Publication time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    published_at: Option<i64>,
}

/// Feed filters.
#[derive(Deserialize, JsonSchema)]
pub(super) struct ArticleListQuery {
    /// Show only articles of the category with the provided slug.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_category_slug")]
    category: Option<String>,

    /// Show only articles written by the provided user.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_database_identifier")]
    author: Option<i64>,
}

/// Errors that may occur during the article list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ArticleListError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Requested category does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "category not found")]
    CategoryNotFound,
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get feed of published articles.")
        .description("Articles are ordered from the most recently published one.")
        .response::<200, Json<Vec<ArticleSummary>>>()
}

/// Published article feed handler.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
    Query(pagination): Query<Pagination>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<Vec<ArticleSummary>>, ArticleListError> {
    article::publish_due(&*db, OffsetDateTime::now_utc()).await?;

    let category_id = match query.category {
        Some(slug) => Some(
            category::Entity::find()
                .select_only()
                .column(category::Column::Id)
                .filter(category::Column::Slug.eq(slug))
                .into_tuple::<i64>()
                .one(&*db)
                .await?
                .ok_or(ArticleListError::CategoryNotFound)?,
        ),
        None => None,
    };

    let mut select =
        article::Entity::find().filter(article::Column::Status.eq(article::Status::Published));

    if let Some(category_id) = category_id {
        select = select.filter(article::Column::CategoryId.eq(category_id));
    }

    if let Some(author_id) = query.author {
        select = select.filter(article::Column::AuthorId.eq(author_id));
    }

    select
        .order_by_desc(article::Column::PublishedAt)
        .order_by_desc(article::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .stream(&*db)
        .await?
        .map_ok(|model| ArticleSummary {
            id: model.id,
            author_id: model.author_id,
            category_id: model.category_id,
            slug: model.slug,
            title: model.title,
            excerpt: model.excerpt,
            published_at: model.published_at.map(unix_timestamp),
        })
        .err_into()
        .try_collect()
        .await
        .map(Json)
}
