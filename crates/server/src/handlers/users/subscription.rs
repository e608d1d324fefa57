use std::sync::Arc;

use aide::transform::TransformOperation;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use db::DatabaseConnection;
use entitlement::Role;
use serde_json::Value;

use crate::{
    auth::AuthenticatedUser,
    handlers::me::subscription::{
        change_tier, SubscriptionError, SubscriptionRequest, SubscriptionResponse,
    },
    schema::example_error,
};

/// Generate OAPI documentation for the [`subscribe`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Change subscription tier of a user.")
        .description(
            r#"Applies the tier of a completed plan purchase. Readers on a paid plan
become subscribers, other readers become free users. Roles of administrators
and editors are kept as is."#,
        )
        .response::<200, Json<SubscriptionResponse>>()
        .response_with::<403, Json<Value>, _>(|op| {
            op.description("Current user is not an administrator.")
                .example(example_error(SubscriptionError::AdminRequired))
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(SubscriptionError::UserNotFound))
        })
}

/// Subscription change handler.
pub(super) async fn subscribe(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(user_id): Path<i64>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, SubscriptionError> {
    if current_user.role() != Role::Admin {
        return Err(SubscriptionError::AdminRequired);
    }

    change_tier(&db, user_id, request.tier).await.map(Json)
}
