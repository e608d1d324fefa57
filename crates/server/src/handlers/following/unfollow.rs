use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{follow, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};

use super::FollowRequest;
use crate::auth::AuthenticatedUser;

#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UnfollowError {
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`unfollow`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Unfollow a writer.").response::<200, ()>()
}

pub(super) async fn unfollow(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<FollowRequest>,
) -> Result<(), UnfollowError> {
    follow::Entity::delete_many()
        .filter(follow::Column::FollowerId.eq(current_user.id()))
        .filter(follow::Column::AuthorId.eq(request.author_id))
        .exec(&*db)
        .await?;

    Ok(())
}
