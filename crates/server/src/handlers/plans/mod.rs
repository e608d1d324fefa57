use std::sync::Arc;

use aide::{
    axum::{routing::get_with, ApiRouter},
    transform::TransformOperation,
};
use axum::Json;
use db::DatabaseConnection;
use entitlement::{SubscriptionPlan, PLANS};

/// Create an [`ApiRouter`] that provides an API server with the plan catalog route.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/", get_with(list, docs))
        .with_path_items(|op| op.tag("Subscriptions"))
}

/// Generate OAPI documentation for the [`list`] handler.
fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of available subscription plans.")
        .description("Prices are provided in cents.")
        .response::<200, Json<Vec<SubscriptionPlan>>>()
}

/// List subscription plans, from the cheapest to the most expensive one.
async fn list() -> Json<Vec<SubscriptionPlan>> {
    Json(PLANS.to_vec())
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, test_router, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn list() {
        let db = create_database().await;

        let response = test_router(db)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/plans")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, [
            {
                "tier": "ONE_ARTICLE",
                "name": "Free",
                "price": 0,
                "interval": "month",
                "monthly_articles": 1,
                "features": ["One free article every month", "Bookmarks"],
            },
            {
                "tier": "TWO_ARTICLES",
                "name": "Reader",
                "price": 299,
                "interval": "article",
                "monthly_articles": 2,
                "features": ["Two articles every month", "Bookmarks", "Follow writers"],
            },
            {
                "tier": "UNLIMITED",
                "name": "Unlimited",
                "price": 4900,
                "interval": "year",
                "monthly_articles": validators::null(),
                "features": ["Unlimited articles", "Bookmarks", "Follow writers"],
            }
        ]);
    }
}
