use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    article, article_view, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    OffsetDateTime, QueryFilter, QuerySelect, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use entitlement::{resolve_article_view, ArticleView, BillingPeriod, Reader};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::unix_timestamp;
use crate::{auth::CurrentReader, schema::example_error};

/// Article content response.
#[derive(Serialize, JsonSchema)]
pub(super) struct ArticleViewData {
    /// Article identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Author's user identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    author_id: i64,

    /// Category identifier, if the article was categorized.
    #[schemars(example = "crate::schema::example_database_identifier")]
    category_id: Option<i64>,

    /// URL-friendly article identifier.
    #[schemars(example = "crate::schema::example_slug")]
    slug: String,

    /// Article title.
    #[schemars(example = "crate::schema::example_title")]
    title: String,

    /// Short description of the article.
    #[schemars(example = "crate::schema::example_excerpt")]
    excerpt: String,

    /// Article content.
    #[schemars(example = "crate::schema::example_content")]
    content: String,

    /// Publication status.
    #[schemars(example = "crate::schema::example_article_status")]
    status: article::Status,

    /// Publication time, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    published_at: Option<i64>,

    /// Count of new articles the reader can still open during the current
    /// billing period, `null` if access is not limited.
    #[schemars(example = "crate::schema::example_remaining_reads")]
    remaining_reads: Option<usize>,
}

impl ArticleViewData {
    fn new(article: article::Model, remaining_reads: Option<usize>) -> Self {
        Self {
            id: article.id,
            author_id: article.author_id,
            category_id: article.category_id,
            slug: article.slug,
            title: article.title,
            excerpt: article.excerpt,
            content: article.content,
            status: article.status,
            published_at: article.published_at.map(unix_timestamp),
            remaining_reads,
        }
    }
}

/// Errors that may occur during the article view.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ArticleViewError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Article does not exist or is not published yet.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "article not found")]
    ArticleNotFound,

    /// Reading quota of the current tier is exhausted.
    #[status(StatusCode::PAYMENT_REQUIRED)]
    #[display(fmt = "subscription upgrade is required to read this article, see /plans")]
    UpgradeRequired,
}

/// Generate OAPI documentation for the [`view`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Read an article.")
        .description(
            r#"Opening an article that wasn't viewed during the current month consumes
one free read of the reader's tier. Articles that were already viewed can be
re-read at any time. Authentication is optional, guests can't open articles."#,
        )
        .response::<200, Json<ArticleViewData>>()
        .response_with::<402, Json<Value>, _>(|op| {
            op.description("Reading quota is exhausted.")
                .example(example_error(ArticleViewError::UpgradeRequired))
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Article not found.")
                .example(example_error(ArticleViewError::ArticleNotFound))
        })
}

/// Entitlement-gated article view handler.
pub(super) async fn view(
    Extension(CurrentReader(current_user)): Extension<CurrentReader>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleViewData>, ArticleViewError> {
    let now = OffsetDateTime::now_utc();

    article::publish_due(&*db, now).await?;

    let article = article::Entity::find()
        .filter(article::Column::Slug.eq(slug))
        .one(&*db)
        .await?
        .ok_or(ArticleViewError::ArticleNotFound)?;

    let can_preview = current_user
        .map(|user| user.role().is_staff() || user.id() == article.author_id)
        .unwrap_or(false);

    // Previews of unpublished articles don't consume reads.
    if article.status != article::Status::Published {
        if !can_preview {
            return Err(ArticleViewError::ArticleNotFound);
        }

        debug!(
            article_id = article.id,
            user_id = ?current_user.map(|user| user.id()),
            "granted article preview"
        );

        return Ok(Json(ArticleViewData::new(article, None)));
    }

    let period = BillingPeriod::containing(now);
    let article_id = article.id;

    let view = db
        .transaction::<_, ArticleView, ArticleViewError>(|txn| {
            Box::pin(async move {
                let user = match current_user {
                    Some(current_user) => {
                        user::Entity::find_by_id(current_user.id())
                            .lock_exclusive()
                            .one(txn)
                            .await?
                    }
                    None => None,
                };

                let reader = match user {
                    Some(user) => {
                        let viewed =
                            article_view::viewed_in_period(txn, user.id, period.key()).await?;

                        Reader::new(user.id, user.role, user.tier, viewed)
                    }
                    None => Reader::guest(),
                };

                let view = resolve_article_view(reader, article_id);

                if let ArticleView::Granted {
                    reader,
                    newly_viewed: true,
                } = &view
                {
                    if let Some(user_id) = reader.id() {
                        article_view::record(txn, user_id, article_id, period.key()).await?;
                    }
                }

                Ok(view)
            })
        })
        .await
        .into_raw_result()?;

    match view {
        ArticleView::Granted {
            reader,
            newly_viewed,
        } => {
            debug!(
                article_id,
                user_id = ?reader.id(),
                newly_viewed,
                "granted article view"
            );

            Ok(Json(ArticleViewData::new(
                article,
                reader.remaining_reads(),
            )))
        }
        ArticleView::Denied => {
            debug!(
                article_id,
                user_id = ?current_user.map(|user| user.id()),
                "denied article view"
            );

            Err(ArticleViewError::UpgradeRequired)
        }
    }
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
    use db::{article, article_view, ConnectionTrait, DatabaseConnection, Statement};
    use entitlement::{BillingPeriod, Role, Tier};
    use serde_json::json;
    use tower::{Service, ServiceExt};

    fn request(slug: &str, token: Option<&str>) -> Request<Body> {
        let builder = Request::builder()
            .method("GET")
            .uri(format!("/articles/{slug}"));

        let builder = match token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        };

        builder.body(Body::empty()).unwrap()
    }

    async fn viewed(db: &DatabaseConnection, user_id: i64) -> Vec<i64> {
        let mut viewed =
            article_view::viewed_in_period(db, user_id, BillingPeriod::current().key())
                .await
                .unwrap();
        viewed.sort_unstable();
        viewed
    }

    async fn publish(db: &DatabaseConnection, slugs: &[&str]) -> (i64, Vec<i64>) {
        let (author, _) = create_user(db, Role::Editor, Tier::None).await;

        let mut ids = Vec::new();

        for slug in slugs {
            ids.push(create_article(db, author, slug, article::Status::Published).await);
        }

        (author, ids)
    }

    #[tokio::test]
    async fn two_article_quota() {
        let db = create_database().await;

        let (_, articles) = publish(&db, &["first", "second", "third"]).await;
        let (reader, token) = create_user(&db, Role::Subscriber, Tier::TwoArticles).await;

        let first = articles[0];

        let mut service = test_router(db.clone());

        let response = service.call(request("first", Some(&token))).await.unwrap();

        assert_json!(response.json().await, {
            "id": first,
            "author_id": validators::i64(|_| Ok(())),
            "category_id": validators::null(),
            "slug": "first",
            "title": "Title of first",
            "excerpt": "Excerpt of first",
            "content": "Content of first",
            "status": "PUBLISHED",
            "published_at": validators::i64(|_| Ok(())),
            "remaining_reads": 1,
        });

        let response = service.call(request("second", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json().await["remaining_reads"], 0);

        let response = service.call(request("third", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        // Already viewed articles stay available.
        let response = service.call(request("first", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(viewed(&db, reader).await, vec![articles[0], articles[1]]);
    }

    #[tokio::test]
    async fn one_article_quota() {
        let db = create_database().await;

        let (_, articles) = publish(&db, &["first", "second"]).await;
        let (reader, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;

        let mut service = test_router(db.clone());

        let response = service.call(request("first", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("first", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("second", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        assert_eq!(viewed(&db, reader).await, vec![articles[0]]);
    }

    #[tokio::test]
    async fn previous_periods_are_ignored() {
        let db = create_database().await;

        let (_, articles) = publish(&db, &["first", "second"]).await;
        let (reader, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;

        article_view::record(&db, reader, articles[0], BillingPeriod::current().key() - 1)
            .await
            .unwrap();

        let response = test_router(db.clone())
            .oneshot(request("second", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(viewed(&db, reader).await, vec![articles[1]]);
    }

    #[tokio::test]
    async fn no_tier_is_denied() {
        let db = create_database().await;

        publish(&db, &["first"]).await;
        let (reader, token) = create_user(&db, Role::FreeUser, Tier::None).await;

        let response = test_router(db.clone())
            .oneshot(request("first", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        assert!(viewed(&db, reader).await.is_empty());
    }

    #[tokio::test]
    async fn guests_are_denied() {
        let db = create_database().await;

        publish(&db, &["first"]).await;

        let mut service = test_router(db);

        let response = service.call(request("first", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let response = service
            .call(request("first", Some("invalid token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn unlimited_tier() {
        let db = create_database().await;

        let (_, articles) = publish(&db, &["first", "second", "third"]).await;
        let (reader, token) = create_user(&db, Role::Subscriber, Tier::Unlimited).await;

        let mut service = test_router(db.clone());

        for slug in ["first", "second", "third"] {
            let response = service.call(request(slug, Some(&token))).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.json().await["remaining_reads"], json!(null));
        }

        assert_eq!(viewed(&db, reader).await, articles);
    }

    #[tokio::test]
    async fn staff_bypass() {
        let db = create_database().await;

        let (author, _) = publish(&db, &["first", "second"]).await;
        create_article(&db, author, "draft", article::Status::Draft).await;
        let (admin, token) = create_user(&db, Role::Admin, Tier::None).await;

        let mut service = test_router(db.clone());

        for slug in ["first", "second", "draft"] {
            let response = service.call(request(slug, Some(&token))).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert!(viewed(&db, admin).await.is_empty());
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_readers() {
        let db = create_database().await;

        let (author, _) = create_user(&db, Role::Editor, Tier::None).await;
        create_article(&db, author, "draft", article::Status::Draft).await;
        let (_, token) = create_user(&db, Role::Subscriber, Tier::Unlimited).await;

        let mut service = test_router(db);

        let response = service.call(request("draft", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = service.call(request("missing", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn author_previews_are_free() {
        let db = create_database().await;

        let (_, articles) = publish(&db, &["first"]).await;
        let (author, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;
        create_article(&db, author, "draft", article::Status::Draft).await;

        let mut service = test_router(db.clone());

        let response = service.call(request("draft", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json().await["status"], "DRAFT");

        let response = service.call(request("first", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("draft", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(viewed(&db, author).await, articles);
    }

    #[tokio::test]
    async fn failed_recording_denies_access() {
        let db = create_database().await;

        publish(&db, &["first"]).await;
        let (reader, token) = create_user(&db, Role::Subscriber, Tier::TwoArticles).await;

        // Reading the view history still works, recording a view does not.
        for sql in [
            "DROP TABLE article_views",
            "CREATE TABLE article_views (user_id INTEGER, article_id INTEGER, period INTEGER)",
        ] {
            db.execute(Statement::from_string(
                db.get_database_backend(),
                String::from(sql),
            ))
            .await
            .unwrap();
        }

        let response = test_router(db.clone())
            .oneshot(request("first", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.text().await.contains("Content of first"));

        assert!(viewed(&db, reader).await.is_empty());
    }

    #[tokio::test]
    async fn upgrade_unlocks_access() {
        let db = create_database().await;

        publish(&db, &["first", "second"]).await;
        let (reader, token) = create_user(&db, Role::FreeUser, Tier::OneArticle).await;
        let (_, admin_token) = create_user(&db, Role::Admin, Tier::None).await;

        let mut service = test_router(db);

        let response = service.call(request("first", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("second", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

        let response = service
            .call(
                Request::builder()
                    .method("POST")
                    .uri(format!("/users/{reader}/subscription"))
                    .header("Authorization", format!("Bearer {admin_token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from_json(json!({ "tier": "TWO_ARTICLES" })))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = service.call(request("second", Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json().await["remaining_reads"], 0);
    }
}
