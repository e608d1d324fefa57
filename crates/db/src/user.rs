//! Registered user.
//!
//! Besides the account credentials, a user record carries the two values that
//! drive article access: a [`Role`] and a subscription [`Tier`]. Article view
//! history lives in a separate table, see [`super::article_view`].

pub use entitlement::{Role, Tier};
use sea_orm::entity::prelude::*;

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Lowercased email address, unique across all users.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2-encoded password hash.
    pub password: String,

    pub display_name: String,
    pub role: Role,
    pub tier: Tier,
    pub created_at: TimeDateTime,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::token::Entity")]
    Tokens,

    #[sea_orm(has_many = "super::article::Entity")]
    Articles,

    #[sea_orm(has_many = "super::article_view::Entity")]
    ArticleViews,

    #[sea_orm(has_many = "super::bookmark::Entity")]
    Bookmarks,
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl Related<super::article_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleViews.def()
    }
}

impl Related<super::bookmark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookmarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
