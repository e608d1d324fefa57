use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Extension};
use axum_derive_error::ErrorResponse;
use db::{token, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};

use crate::auth::AuthenticatedUser;

/// Errors that may occur during the token revocation.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserLogoutError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`logout`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Revoke the authentication token used for this request.")
        .response::<200, ()>()
}

/// Delete the current authentication token.
pub(super) async fn logout(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<(), UserLogoutError> {
    token::Entity::delete_by_id(current_user.token_id())
        .exec(&*db)
        .await?;

    Ok(())
}
