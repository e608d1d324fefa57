use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait, QuerySelect,
    TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use entitlement::{plan::requires_payment, Role, Tier};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{auth::AuthenticatedUser, schema::example_error};

/// Errors that may occur during the subscription change.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(crate) enum SubscriptionError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// User was not found.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,

    /// Paid plans are applied by administrators once the payment is completed.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "paid plans are activated after the payment is completed, see /plans")]
    PaymentRequired,

    /// Only administrators may change subscriptions of other users.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "only administrators can change subscriptions of other users")]
    AdminRequired,
}

/// Subscription change request.
#[derive(Deserialize, JsonSchema)]
pub(crate) struct SubscriptionRequest {
    /// New subscription tier.
    #[schemars(example = "crate::schema::example_tier")]
    pub tier: Tier,
}

/// Role and tier after the subscription change.
#[derive(Serialize, JsonSchema)]
pub(crate) struct SubscriptionResponse {
    /// Account role.
    #[schemars(example = "crate::schema::example_role")]
    role: Role,

    /// Subscription tier.
    #[schemars(example = "crate::schema::example_tier")]
    tier: Tier,
}

/// Generate OAPI documentation for the [`subscribe`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Switch the current user to a free plan.")
        .description(
            r#"Moves the current user to a plan without a price, or cancels the
subscription with `NONE`. Paid plans are applied by administrators after the
payment is completed."#,
        )
        .response::<200, Json<SubscriptionResponse>>()
        .response_with::<403, Json<Value>, _>(|op| {
            op.description("Requested plan requires a payment.")
                .example(example_error(SubscriptionError::PaymentRequired))
        })
}

/// Role a reader ends up with after switching to the provided tier.
fn role_for(current: Role, tier: Tier) -> Role {
    if current.is_staff() {
        return current;
    }

    if requires_payment(tier) {
        Role::Subscriber
    } else {
        Role::FreeUser
    }
}

/// Set the tier of a user, updating the role of non-staff users accordingly.
pub(crate) async fn change_tier(
    db: &DatabaseConnection,
    user_id: i64,
    tier: Tier,
) -> Result<SubscriptionResponse, SubscriptionError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let user = user::Entity::find_by_id(user_id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(SubscriptionError::UserNotFound)?;

            let previous_tier = user.tier;
            let role = role_for(user.role, tier);

            let mut model: user::ActiveModel = user.into();
            model.role = ActiveValue::Set(role);
            model.tier = ActiveValue::Set(tier);
            model.update(txn).await?;

            info!(
                user_id,
                from = ?previous_tier,
                to = ?tier,
                "subscription tier changed"
            );

            Ok(SubscriptionResponse { role, tier })
        })
    })
    .await
    .into_raw_result()
}

/// Free plan switch handler.
pub(super) async fn subscribe(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, SubscriptionError> {
    if requires_payment(request.tier) {
        return Err(SubscriptionError::PaymentRequired);
    }

    change_tier(&db, current_user.id(), request.tier)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, create_user, test_router, RequestBodyExt, ResponseBodyExt};

    use assert_json::assert_json;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::{user, EntityTrait};
    use entitlement::{Role, Tier};
    use serde_json::json;
    use tower::{Service, ServiceExt};

    use super::role_for;

    fn request(token: &str, tier: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/me/subscription")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from_json(json!({ "tier": tier })))
            .unwrap()
    }

    #[test]
    fn roles() {
        assert_eq!(role_for(Role::User, Tier::Unlimited), Role::Subscriber);
        assert_eq!(role_for(Role::FreeUser, Tier::TwoArticles), Role::Subscriber);
        assert_eq!(role_for(Role::Subscriber, Tier::OneArticle), Role::FreeUser);
        assert_eq!(role_for(Role::Subscriber, Tier::None), Role::FreeUser);
        assert_eq!(role_for(Role::Editor, Tier::Unlimited), Role::Editor);
        assert_eq!(role_for(Role::Admin, Tier::None), Role::Admin);
    }

    #[tokio::test]
    async fn downgrade() {
        let db = create_database().await;

        let (id, token) = create_user(&db, Role::Subscriber, Tier::TwoArticles).await;

        let response = test_router(db.clone())
            .oneshot(request(&token, "ONE_ARTICLE"))
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "role": "FREE_USER",
            "tier": "ONE_ARTICLE",
        });

        let user = user::Entity::find_by_id(id)
            .one(&db)
            .await
            .unwrap()
            .expect("user is missing");

        assert_eq!(user.role, Role::FreeUser);
        assert_eq!(user.tier, Tier::OneArticle);
    }

    #[tokio::test]
    async fn paid_plans_are_rejected() {
        let db = create_database().await;

        let (id, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;

        let mut service = test_router(db.clone());

        for tier in ["TWO_ARTICLES", "UNLIMITED"] {
            let response = service.call(request(&token, tier)).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        let user = user::Entity::find_by_id(id)
            .one(&db)
            .await
            .unwrap()
            .expect("user is missing");

        assert_eq!(user.role, Role::FreeUser);
        assert_eq!(user.tier, Tier::OneArticle);
    }

    #[tokio::test]
    async fn unknown_tier() {
        let db = create_database().await;

        let (_, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;

        let response = test_router(db)
            .oneshot(request(&token, "PLATINUM"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
