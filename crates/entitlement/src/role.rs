//! Account roles and subscription tiers.
//!
//! With the `sea-orm` feature enabled both enums are stored as strings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(Some(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ADMIN"))]
    Admin,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "EDITOR"))]
    Editor,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SUBSCRIBER"))]
    Subscriber,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "FREE_USER"))]
    FreeUser,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "USER"))]
    User,
}

impl Role {
    /// Staff members manage content and are never subject to reading quotas.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }
}

/// Subscription tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum),
    sea_orm(rs_type = "String", db_type = "String(Some(16))")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "UNLIMITED"))]
    Unlimited,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "TWO_ARTICLES"))]
    TwoArticles,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ONE_ARTICLE"))]
    OneArticle,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "NONE"))]
    None,
}
