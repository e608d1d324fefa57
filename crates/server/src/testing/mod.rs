use std::{error::Error, sync::Arc};

use axum::{async_trait, Router};
use common::config::Config;
use db::{
    article, timestamp, token, user, ActiveValue, Database, DatabaseConnection, EntityTrait,
    OffsetDateTime,
};
use entitlement::{Role, Tier};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Create an application router over a test database.
pub(crate) fn test_router(db: DatabaseConnection) -> Router {
    crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
}

/// Insert a user directly into the database and issue an authentication token.
///
/// Returns both the user identifier and the token value.
pub(crate) async fn create_user(db: &DatabaseConnection, role: Role, tier: Tier) -> (i64, String) {
    let email = format!("{role:?}.{tier:?}.{}@example.com", rand::random::<u32>());

    let user = user::Entity::insert(user::ActiveModel {
        email: ActiveValue::Set(email.to_lowercase()),
        password: ActiveValue::Set(String::new()),
        display_name: ActiveValue::Set(format!("{role:?} reader")),
        role: ActiveValue::Set(role),
        tier: ActiveValue::Set(tier),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create user");

    let (model, token) = token::generate_token(user.id);

    token::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .expect("unable to insert token");

    (user.id, token)
}

/// Insert an article written by the provided author.
pub(crate) async fn create_article(
    db: &DatabaseConnection,
    author_id: i64,
    slug: &str,
    status: article::Status,
) -> i64 {
    let now = timestamp(OffsetDateTime::now_utc());

    article::Entity::insert(article::ActiveModel {
        author_id: ActiveValue::Set(author_id),
        category_id: ActiveValue::Set(None),
        slug: ActiveValue::Set(String::from(slug)),
        title: ActiveValue::Set(format!("Title of {slug}")),
        excerpt: ActiveValue::Set(format!("Excerpt of {slug}")),
        content: ActiveValue::Set(format!("Content of {slug}")),
        status: ActiveValue::Set(status),
        published_at: ActiveValue::Set((status == article::Status::Published).then_some(now)),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to insert article")
    .id
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
