pub mod article;
pub mod article_view;
pub mod bookmark;
pub mod category;
pub mod follow;
pub mod token;
pub mod user;

use std::error::Error;

use async_trait::async_trait;
pub use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, RelationTrait, Statement, StatementBuilder, TransactionError, TransactionTrait,
};
pub use time::{OffsetDateTime, PrimitiveDateTime};

/// Convert an [`OffsetDateTime`] into the UTC-based timestamp stored in the database.
pub fn timestamp(at: OffsetDateTime) -> PrimitiveDateTime {
    let at = at.to_offset(time::UtcOffset::UTC);

    PrimitiveDateTime::new(at.date(), at.time())
}

/// Connect to an in-memory database for unit tests.
///
/// Tables of this crate's unit tests are created one by one, so foreign keys
/// aren't enforced.
#[cfg(test)]
pub(crate) async fn test_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        String::from("PRAGMA foreign_keys = OFF"),
    ))
    .await
    .expect("unable to disable foreign keys");

    db
}

/// Create a table for the provided entity.
///
/// Unit tests of this crate can't depend on migrations, so tables
/// are derived from entity definitions instead.
#[cfg(test)]
pub(crate) async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = db.get_database_backend();
    let schema = sea_orm::Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(entity)))
        .await
        .expect("unable to create table");
}

pub trait TransactionErrorExt<T, E> {
    /// Convert transaction [`Result`] into a [`Result`] with
    /// a custom error.
    fn into_raw_result(self) -> Result<T, E>;
}

impl<T, E> TransactionErrorExt<T, E> for Result<T, TransactionError<E>>
where
    E: Error + From<DbErr>,
{
    fn into_raw_result(self) -> Result<T, E> {
        match self {
            Ok(val) => Ok(val),
            Err(TransactionError::Connection(err)) => Err(err.into()),
            Err(TransactionError::Transaction(err)) => Err(err),
        }
    }
}

#[async_trait]
pub trait SelectExt {
    /// Check if at least one record that satisfies a query.
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr>;
}

#[async_trait]
impl<T> SelectExt for T
where
    T: QueryTrait<QueryStatement = sea_query::SelectStatement> + Send,
{
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr> {
        use sea_query::{Expr, Query};

        let mut query = self.into_query();

        // Fix failing tests with SQLite by returning at least some expr
        query.expr(1);

        let stmt = StatementBuilder::build(
            Query::select().expr(Expr::exists(query)),
            &db.get_database_backend(),
        );

        db.query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::Custom(String::from("exists query returned no rows")))?
            .try_get_by_index(0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveValue, EntityTrait, QueryFilter, QuerySelect};

    use crate::{category, create_table, test_database, ColumnTrait, SelectExt};

    #[tokio::test]
    async fn exists() {
        let db = test_database().await;

        create_table(&db, category::Entity).await;

        let exists = category::Entity::find()
            .select_only()
            .exists(&db)
            .await
            .unwrap();

        assert!(!exists);

        category::Entity::insert(category::ActiveModel {
            name: ActiveValue::Set(String::from("Essays")),
            slug: ActiveValue::Set(String::from("essays")),
            ..Default::default()
        })
        .exec_without_returning(&db)
        .await
        .unwrap();

        let exists = category::Entity::find()
            .select_only()
            .filter(category::Column::Slug.eq("essays"))
            .exists(&db)
            .await
            .unwrap();

        assert!(exists);

        let exists = category::Entity::find()
            .select_only()
            .filter(category::Column::Slug.eq("poetry"))
            .exists(&db)
            .await
            .unwrap();

        assert!(!exists);
    }
}
