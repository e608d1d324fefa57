use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    article, bookmark, sea_query::OnConflict, timestamp, ActiveValue, DatabaseConnection, DbErr,
    EntityTrait, OffsetDateTime, QuerySelect, SelectExt,
};
use derive_more::{Display, Error, From};

use super::BookmarkRequest;
use crate::auth::AuthenticatedUser;

/// Errors that may occur during the bookmark creation.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum BookmarkCreationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Article does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "article not found")]
    ArticleNotFound,
}

/// Generate OAPI documentation for the [`add`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Bookmark an article.")
        .description("Bookmarking an already bookmarked article does nothing.")
        .response::<200, ()>()
}

/// Bookmark creation handler.
pub(super) async fn add(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<BookmarkRequest>,
) -> Result<(), BookmarkCreationError> {
    let exists = article::Entity::find_by_id(request.article_id)
        .select_only()
        .exists(&*db)
        .await?;

    if !exists {
        return Err(BookmarkCreationError::ArticleNotFound);
    }

    bookmark::Entity::insert(bookmark::ActiveModel {
        user_id: ActiveValue::Set(current_user.id()),
        article_id: ActiveValue::Set(request.article_id),
        created_at: ActiveValue::Set(timestamp(OffsetDateTime::now_utc())),
    })
    .on_conflict(
        OnConflict::columns([bookmark::Column::UserId, bookmark::Column::ArticleId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&*db)
    .await?;

    Ok(())
}
