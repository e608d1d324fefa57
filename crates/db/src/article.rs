//! Published and unpublished articles.
//!
//! Articles are created as [`Status::Draft`] and are only visible in reader
//! feeds once they reach [`Status::Published`]. A [`Status::Scheduled`] article
//! carries a `scheduled_at` timestamp and is promoted by [`publish_due`] once
//! that moment has passed.

use schemars::JsonSchema;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, SimpleExpr},
    ConnectionTrait,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Article model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    pub category_id: Option<i64>,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub status: Status,
    pub scheduled_at: Option<TimeDateTime>,
    pub published_at: Option<TimeDateTime>,
    pub created_at: TimeDateTime,
    pub updated_at: TimeDateTime,
}

/// Article publication status.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[sea_orm(num_value = 0)]
    Draft,
    #[sea_orm(num_value = 1)]
    Published,
    #[sea_orm(num_value = 2)]
    Scheduled,
}

/// Article model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Promote every scheduled article whose publication moment is not
/// later than `now`.
///
/// Returns the number of promoted articles.
pub async fn publish_due<C: ConnectionTrait>(db: &C, now: OffsetDateTime) -> Result<u64, DbErr> {
    let now = crate::timestamp(now);

    let result = Entity::update_many()
        .col_expr(Column::Status, SimpleExpr::Value(Status::Published.into()))
        .col_expr(Column::PublishedAt, Expr::col(Column::ScheduledAt).into())
        .col_expr(Column::UpdatedAt, SimpleExpr::Value(now.into()))
        .filter(Column::Status.eq(Status::Scheduled))
        .filter(Column::ScheduledAt.lte(now))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
