use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use common::config::Config;
use db::{
    token, user, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use entitlement::{plan::requires_payment, Role, Tier};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::{
    password::{self, PasswordError},
    schema::example_error,
    validation::ValidatedJson,
};

/// Errors that may occur during the user registration process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserRegistrationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Password hashing error.
    PasswordError(PasswordError),

    /// Registration of new users is disabled.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "registration is closed")]
    RegistrationClosed,

    /// Provided email address is already registered.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "email address is already registered")]
    EmailTaken,

    /// Paid plans can't be picked before the payment is completed.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "paid plans are activated after the payment is completed, see /plans")]
    PaymentRequired,
}

/// User registration request.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct UserRegistrationRequest {
    /// Email address used to log in.
    #[validate(email)]
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    /// Account password.
    #[validate(length(min = 8, max = 128))]
    #[schemars(example = "crate::schema::example_password")]
    password: String,

    /// Name displayed next to articles and comments.
    #[validate(length(min = 1, max = 64))]
    #[schemars(example = "crate::schema::example_display_name")]
    display_name: String,

    /// Tier of the chosen free plan, if any.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_tier")]
    tier: Option<Tier>,
}

/// Registered user's authentication token response.
#[derive(Serialize, JsonSchema)]
pub(super) struct UserRegistrationResponse {
    /// Authentication token.
    #[schemars(example = "crate::schema::example_token")]
    token: String,
}

/// Generate OAPI documentation for the [`register`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register new user.")
        .description(
            r#"Creates a reader account and returns an authentication token for it.
The account starts with the tier of the chosen free plan, or without any
tier if no plan was chosen. Paid plans are applied after the payment."#,
        )
        .response::<200, Json<UserRegistrationResponse>>()
        .response_with::<403, Json<Value>, _>(|op| {
            op.description("Registration is closed or a paid plan was chosen.")
                .example(example_error(UserRegistrationError::PaymentRequired))
        })
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Email address is already registered.")
                .example(example_error(UserRegistrationError::EmailTaken))
        })
}

/// User registration handler.
pub(super) async fn register(
    State(db): State<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
    ValidatedJson(request): ValidatedJson<UserRegistrationRequest>,
) -> Result<Json<UserRegistrationResponse>, UserRegistrationError> {
    if !config.accounts.registration {
        return Err(UserRegistrationError::RegistrationClosed);
    }

    let tier = request.tier.unwrap_or(Tier::None);

    if requires_payment(tier) {
        return Err(UserRegistrationError::PaymentRequired);
    }

    let email = request.email.to_lowercase();

    let role = if config
        .accounts
        .admins
        .iter()
        .any(|admin| admin.eq_ignore_ascii_case(&email))
    {
        Role::Admin
    } else {
        Role::User
    };

    let password = password::hash(request.password).await?;

    db.transaction(|txn| {
        Box::pin(async move {
            let taken = user::Entity::find()
                .select_only()
                .filter(user::Column::Email.eq(email.as_str()))
                .exists(txn)
                .await?;

            if taken {
                return Err(UserRegistrationError::EmailTaken);
            }

            let user = user::Entity::insert(user::ActiveModel {
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password),
                display_name: ActiveValue::Set(request.display_name),
                role: ActiveValue::Set(role),
                tier: ActiveValue::Set(tier),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            let (model, token) = token::generate_token(user.id);

            token::Entity::insert(model)
                .exec_without_returning(txn)
                .await?;

            info!(user_id = user.id, ?role, ?tier, "registered new user");

            Ok(Json(UserRegistrationResponse { token }))
        })
    })
    .await
    .into_raw_result()
}
