use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    follow, sea_query::OnConflict, timestamp, user, ActiveValue, DatabaseConnection, DbErr,
    EntityTrait, OffsetDateTime, QuerySelect, SelectExt,
};
use derive_more::{Display, Error, From};
use serde_json::Value;

use super::FollowRequest;
use crate::{auth::AuthenticatedUser, schema::example_error};

/// Errors that may occur when following a writer.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum FollowError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Writer does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "author not found")]
    AuthorNotFound,

    /// Users can't follow themselves.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "unable to follow yourself")]
    SelfFollow,
}

/// Generate OAPI documentation for the [`follow`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Follow a writer.")
        .description("Following an already followed writer does nothing.")
        .response::<200, ()>()
        .response_with::<422, Json<Value>, _>(|op| {
            op.description("Attempt to follow yourself.")
                .example(example_error(FollowError::SelfFollow))
        })
}

/// Writer follow handler.
pub(super) async fn follow(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<FollowRequest>,
) -> Result<(), FollowError> {
    if request.author_id == current_user.id() {
        return Err(FollowError::SelfFollow);
    }

    let exists = user::Entity::find_by_id(request.author_id)
        .select_only()
        .exists(&*db)
        .await?;

    if !exists {
        return Err(FollowError::AuthorNotFound);
    }

    follow::Entity::insert(follow::ActiveModel {
        follower_id: ActiveValue::Set(current_user.id()),
        author_id: ActiveValue::Set(request.author_id),
        created_at: ActiveValue::Set(timestamp(OffsetDateTime::now_utc())),
    })
    .on_conflict(
        OnConflict::columns([follow::Column::FollowerId, follow::Column::AuthorId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&*db)
    .await?;

    Ok(())
}
