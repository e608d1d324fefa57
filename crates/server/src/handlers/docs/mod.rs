use std::sync::Arc;

use aide::{
    axum::{routing::get, ApiRouter},
    openapi::OpenApi,
    redoc::Redoc,
};
use axum::{Extension, Json};
use db::DatabaseConnection;

/// Serve the generated OpenAPI document.
async fn api_json(Extension(api): Extension<Arc<OpenApi>>) -> Json<Arc<OpenApi>> {
    Json(api)
}

/// Create an [`ApiRouter`] that provides an API server with documentation routes.
///
/// Routes are only mounted if `server.docs` is enabled in the configuration.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .route("/", Redoc::new("/docs/api.json").axum_route())
        .route("/api.json", get(api_json))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_database, test_router, ResponseBodyExt};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::{Service, ServiceExt};

    #[tokio::test]
    async fn api_document() {
        let db = create_database().await;

        let response = test_router(db)
            .oneshot(
                Request::builder()
                    .uri("/docs/api.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.json().await;

        assert_eq!(body["info"]["title"], "usethinkup API");

        for path in [
            "/auth/register",
            "/auth/login",
            "/me",
            "/me/subscription",
            "/plans",
            "/articles",
            "/articles/{slug}",
            "/articles/{slug}/status",
            "/bookmarks",
            "/following",
            "/users/{id}/subscription",
        ] {
            let paths = &body["paths"];

            assert!(
                paths.get(path).or_else(|| paths.get(format!("{path}/"))).is_some(),
                "{path} is missing from the api document"
            );
        }
    }

    #[tokio::test]
    async fn redoc_page() {
        let db = create_database().await;

        let response = test_router(db)
            .call(Request::builder().uri("/docs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
