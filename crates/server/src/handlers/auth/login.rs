use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    password::{self, PasswordError},
    schema::example_error,
    validation::ValidatedJson,
};

/// Errors that may occur during the user authentication process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserAuthenticationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Password verification error.
    PasswordError(PasswordError),

    /// Unknown email address or wrong password.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid email or password")]
    InvalidCredentials,
}

/// User authentication request.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct UserAuthenticationRequest {
    /// Email address provided during registration.
    #[validate(email)]
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    /// Account password.
    #[schemars(example = "crate::schema::example_password")]
    password: String,
}

/// Authentication token response.
#[derive(Serialize, JsonSchema)]
pub(super) struct UserAuthenticationResponse {
    /// Authentication token.
    #[schemars(example = "crate::schema::example_token")]
    token: String,
}

/// Generate OAPI documentation for the [`login`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Authenticate with email and password.")
        .response::<200, Json<UserAuthenticationResponse>>()
        .response_with::<403, Json<Value>, _>(|op| {
            op.description("Invalid credentials were provided.")
                .example(example_error(UserAuthenticationError::InvalidCredentials))
        })
}

/// User authentication handler.
pub(super) async fn login(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserAuthenticationRequest>,
) -> Result<Json<UserAuthenticationResponse>, UserAuthenticationError> {
    let (user_id, encoded): (i64, String) = user::Entity::find()
        .select_only()
        .columns([user::Column::Id, user::Column::Password])
        .filter(user::Column::Email.eq(request.email.to_lowercase()))
        .into_tuple()
        .one(&*db)
        .await?
        .ok_or(UserAuthenticationError::InvalidCredentials)?;

    if !password::verify(encoded, request.password).await? {
        return Err(UserAuthenticationError::InvalidCredentials);
    }

    let (model, token) = token::generate_token(user_id);

    token::Entity::insert(model)
        .exec_without_returning(&*db)
        .await?;

    Ok(Json(UserAuthenticationResponse { token }))
}
