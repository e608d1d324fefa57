//! Articles consumed by a user during a billing period.
//!
//! Every row is keyed by `(user_id, article_id, period)`, which makes the
//! per-period view history a set: recording an already recorded view is a
//! no-op at the storage level, so concurrent requests cannot duplicate or
//! lose entries.

use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue, ConnectionTrait, QuerySelect};
use time::OffsetDateTime;

/// Article view model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "article_views")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub article_id: i64,

    /// Billing period key, `year * 100 + month`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub period: i32,

    pub viewed_at: TimeDateTime,
}

/// Article view model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::Id"
    )]
    Article,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Get identifiers of articles viewed by a user during the provided period.
pub async fn viewed_in_period<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    period: i32,
) -> Result<Vec<i64>, DbErr> {
    Entity::find()
        .select_only()
        .column(Column::ArticleId)
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Period.eq(period))
        .into_tuple()
        .all(db)
        .await
}

/// Record an article view, doing nothing if it was already recorded
/// for the same period.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    article_id: i64,
    period: i32,
) -> Result<(), DbErr> {
    Entity::insert(ActiveModel {
        user_id: ActiveValue::Set(user_id),
        article_id: ActiveValue::Set(article_id),
        period: ActiveValue::Set(period),
        viewed_at: ActiveValue::Set(crate::timestamp(OffsetDateTime::now_utc())),
    })
    .on_conflict(
        OnConflict::columns([Column::UserId, Column::ArticleId, Column::Period])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait};
    use time::OffsetDateTime;

    use crate::{article, article_view, create_table, test_database, timestamp, user};

    async fn create_test_env() -> DatabaseConnection {
        let db = test_database().await;

        create_table(&db, user::Entity).await;
        create_table(&db, article::Entity).await;
        create_table(&db, article_view::Entity).await;

        db
    }

    async fn insert_view(db: &DatabaseConnection, user_id: i64, article_id: i64, period: i32) {
        article_view::Entity::insert(article_view::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            article_id: ActiveValue::Set(article_id),
            period: ActiveValue::Set(period),
            viewed_at: ActiveValue::Set(timestamp(OffsetDateTime::now_utc())),
        })
        .exec_without_returning(db)
        .await
        .expect("unable to insert article view");
    }

    #[tokio::test]
    async fn views_are_scoped_to_period() {
        let db = create_test_env().await;

        insert_view(&db, 1, 10, 202609).await;
        insert_view(&db, 1, 11, 202610).await;
        insert_view(&db, 2, 12, 202610).await;

        let viewed = super::viewed_in_period(&db, 1, 202610).await.unwrap();
        assert_eq!(viewed, vec![11]);

        let viewed = super::viewed_in_period(&db, 1, 202611).await.unwrap();
        assert!(viewed.is_empty());
    }

    #[tokio::test]
    async fn recording_is_idempotent() {
        let db = create_test_env().await;

        super::record(&db, 1, 10, 202610).await.unwrap();
        super::record(&db, 1, 10, 202610).await.unwrap();
        super::record(&db, 1, 10, 202611).await.unwrap();

        let count = article_view::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 2);

        let viewed = super::viewed_in_period(&db, 1, 202610).await.unwrap();
        assert_eq!(viewed, vec![10]);
    }
}
