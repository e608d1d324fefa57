use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{article_view, user, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};
use entitlement::{BillingPeriod, Reader, Role, Tier};
use schemars::JsonSchema;
use serde::Serialize;

use crate::auth::AuthenticatedUser;

/// Current user's profile and reading quota.
#[derive(Serialize, JsonSchema)]
pub(super) struct ProfileData {
    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Email address.
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    /// Displayed name.
    #[schemars(example = "crate::schema::example_display_name")]
    display_name: String,

    /// Account role.
    #[schemars(example = "crate::schema::example_role")]
    role: Role,

    /// Subscription tier.
    #[schemars(example = "crate::schema::example_tier")]
    tier: Tier,

    /// Current billing period, formatted as `YYYY-MM`.
    #[schemars(example = "crate::schema::example_period")]
    period: String,

    /// Identifiers of articles viewed during the current billing period.
    #[schemars(example = "crate::schema::example_viewed")]
    viewed: Vec<i64>,

    /// Count of new articles that can still be opened during the current
    /// billing period, `null` if access is not limited.
    #[schemars(example = "crate::schema::example_remaining_reads")]
    remaining_reads: Option<usize>,
}

/// Errors that may occur during the profile request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ProfileError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Authenticated user was deleted during the request.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,
}

/// Generate OAPI documentation for the [`profile`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get current user's profile.")
        .description("Includes the view history and remaining free reads of the current month.")
        .response::<200, Json<ProfileData>>()
}

/// Current user's profile handler.
pub(super) async fn profile(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ProfileData>, ProfileError> {
    let user = user::Entity::find_by_id(current_user.id())
        .one(&*db)
        .await?
        .ok_or(ProfileError::UserNotFound)?;

    let period = BillingPeriod::current();
    let viewed = article_view::viewed_in_period(&*db, user.id, period.key()).await?;
    let reader = Reader::new(user.id, user.role, user.tier, viewed);

    Ok(Json(ProfileData {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        tier: user.tier,
        period: period.to_string(),
        viewed: reader.viewed().iter().copied().collect(),
        remaining_reads: reader.remaining_reads(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, create_user, test_router, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::article_view;
    use entitlement::{BillingPeriod, Role, Tier};
    use tower::ServiceExt;

    fn request(token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/me")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn quota_is_reported() {
        let db = create_database().await;

        let (id, token) = create_user(&db, Role::Subscriber, Tier::TwoArticles).await;

        let period = BillingPeriod::current();
        let author = create_user(&db, Role::Editor, Tier::None).await.0;
        let article = crate::testing::create_article(
            &db,
            author,
            "why-we-read",
            db::article::Status::Published,
        )
        .await;

        article_view::record(&db, id, article, period.key())
            .await
            .unwrap();
        article_view::record(&db, id, article, period.key() - 100)
            .await
            .unwrap();

        let response = test_router(db).oneshot(request(&token)).await.unwrap();
        let body = response.json().await;

        assert_eq!(body["period"], period.to_string());

        assert_json!(body, {
            "id": id,
            "email": validators::string(|_| Ok(())),
            "display_name": "Subscriber reader",
            "role": "SUBSCRIBER",
            "tier": "TWO_ARTICLES",
            "period": validators::string(|_| Ok(())),
            "viewed": [article],
            "remaining_reads": 1,
        });
    }

    #[tokio::test]
    async fn staff_is_unlimited() {
        let db = create_database().await;

        let (_, token) = create_user(&db, Role::Admin, Tier::None).await;

        let response = test_router(db).oneshot(request(&token)).await.unwrap();

        assert_json!(response.json().await, {
            "id": validators::i64(|_| Ok(())),
            "email": validators::string(|_| Ok(())),
            "display_name": validators::string(|_| Ok(())),
            "role": "ADMIN",
            "tier": "NONE",
            "period": validators::string(|_| Ok(())),
            "viewed": [],
            "remaining_reads": validators::null(),
        });
    }

    #[tokio::test]
    async fn unauthenticated() {
        let db = create_database().await;

        let response = test_router(db)
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::NOT_FOUND);
    }
}
