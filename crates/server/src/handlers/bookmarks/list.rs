use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    article, bookmark, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PrimitiveDateTime,
    QueryFilter, QueryOrder, QuerySelect,
};
use derive_more::{Display, Error, From};
use futures_util::TryStreamExt;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{auth::AuthenticatedUser, pagination::Pagination};

/// A single bookmark data.
#[derive(Serialize, JsonSchema)]
pub(super) struct BookmarkData {
    /// Bookmarked article identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    article_id: i64,

    /// URL-friendly article identifier.
    #[schemars(example = "crate::schema::example_slug")]
    slug: String,

    /// Article title.
    #[schemars(example = "crate::schema::example_title")]
    title: String,

    /// Bookmark creation time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    timestamp: i64,
}

/// Errors that may occur during the bookmark list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum BookmarkListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of bookmarked articles.")
        .description("Bookmarks are ordered from the most recent one.")
        .response::<200, Json<Vec<BookmarkData>>>()
}

/// List articles bookmarked by the current user.
pub(super) async fn list(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<BookmarkData>>, BookmarkListError> {
    bookmark::Entity::find()
        .select_only()
        .column(bookmark::Column::ArticleId)
        .columns([article::Column::Slug, article::Column::Title])
        .column(bookmark::Column::CreatedAt)
        .inner_join(article::Entity)
        .filter(bookmark::Column::UserId.eq(current_user.id()))
        .order_by_desc(bookmark::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .into_tuple::<(i64, String, String, PrimitiveDateTime)>()
        .stream(&*db)
        .await?
        .map_ok(|(article_id, slug, title, created_at)| BookmarkData {
            article_id,
            slug,
            title,
            timestamp: created_at.assume_utc().unix_timestamp(),
        })
        .err_into()
        .try_collect()
        .await
        .map(Json)
}
