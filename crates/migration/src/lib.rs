pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users_table;
mod m20261001_000002_create_authentication_tokens_table;
mod m20261001_000003_create_categories_table;
mod m20261001_000004_create_articles_table;
mod m20261001_000005_create_article_views_table;
mod m20261001_000006_create_bookmarks_table;
mod m20261001_000007_create_follows_table;

pub(crate) use m20261001_000001_create_users_table::Users;
pub(crate) use m20261001_000003_create_categories_table::Categories;
pub(crate) use m20261001_000004_create_articles_table::Articles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users_table::Migration),
            Box::new(m20261001_000002_create_authentication_tokens_table::Migration),
            Box::new(m20261001_000003_create_categories_table::Migration),
            Box::new(m20261001_000004_create_articles_table::Migration),
            Box::new(m20261001_000005_create_article_views_table::Migration),
            Box::new(m20261001_000006_create_bookmarks_table::Migration),
            Box::new(m20261001_000007_create_follows_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::{prelude::*, sea_orm::Database};

    use super::Migrator;

    #[tokio::test]
    async fn up_and_down() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("unable to create test database");

        Migrator::up(&db, None).await.expect("unable to apply migrations");

        let manager = SchemaManager::new(&db);
        for table in [
            "users",
            "authentication_tokens",
            "categories",
            "articles",
            "article_views",
            "bookmarks",
            "follows",
        ] {
            assert!(manager.has_table(table).await.unwrap(), "{table} is missing");
        }

        Migrator::down(&db, None).await.expect("unable to revert migrations");

        assert!(!manager.has_table("users").await.unwrap());
    }
}
