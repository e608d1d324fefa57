use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArticleViews::Table)
                    .col(ColumnDef::new(ArticleViews::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ArticleViews::ArticleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArticleViews::Period).integer().not_null())
                    .col(
                        ColumnDef::new(ArticleViews::ViewedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ArticleViews::UserId)
                            .col(ArticleViews::Period)
                            .col(ArticleViews::ArticleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ArticleViews::Table, ArticleViews::UserId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ArticleViews::Table, ArticleViews::ArticleId)
                            .to(crate::Articles::Table, crate::Articles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleViews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ArticleViews {
    Table,
    UserId,
    ArticleId,
    Period,
    ViewedAt,
}
