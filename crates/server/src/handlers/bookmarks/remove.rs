use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{bookmark, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use derive_more::{Display, Error, From};

use super::BookmarkRequest;
use crate::auth::AuthenticatedUser;

#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum BookmarkRemovalError {
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`remove`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Remove an article from bookmarks.")
        .response::<200, ()>()
}

pub(super) async fn remove(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<BookmarkRequest>,
) -> Result<(), BookmarkRemovalError> {
    bookmark::Entity::delete_many()
        .filter(bookmark::Column::UserId.eq(current_user.id()))
        .filter(bookmark::Column::ArticleId.eq(request.article_id))
        .exec(&*db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::testing::{
        create_article, create_database, create_user, test_router, RequestBodyExt,
        ResponseBodyExt,
    };

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::article;
    use entitlement::{Role, Tier};
    use serde_json::json;
    use tower::Service;

    fn request(method: &str, token: &str, article_id: Option<i64>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri("/bookmarks")
            .header("Authorization", format!("Bearer {token}"));

        let request = match article_id {
            Some(article_id) => builder
                .header("Content-Type", "application/json")
                .body(Body::from_json(json!({ "article_id": article_id }))),
            None => builder.body(Body::empty()),
        };

        request.unwrap()
    }

    #[tokio::test]
    async fn add_list_and_remove() {
        let db = create_database().await;

        let (author, _) = create_user(&db, Role::Editor, Tier::None).await;
        let (_, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;
        let article_id =
            create_article(&db, author, "why-we-read", article::Status::Published).await;

        let mut service = test_router(db);

        for _ in 0..2 {
            let response = service
                .call(request("POST", &token, Some(article_id)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = service.call(request("GET", &token, None)).await.unwrap();

        assert_json!(response.json().await, [
            {
                "article_id": article_id,
                "slug": "why-we-read",
                "title": "Title of why-we-read",
                "timestamp": validators::i64(|_| Ok(())),
            }
        ]);

        let response = service
            .call(request("DELETE", &token, Some(article_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("GET", &token, None)).await.unwrap();
        assert_json!(response.json().await, []);
    }

    #[tokio::test]
    async fn unknown_article() {
        let db = create_database().await;

        let (_, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;

        let response = test_router(db)
            .call(request("POST", &token, Some(404)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
