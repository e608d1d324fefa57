use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    article, category, timestamp, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, OffsetDateTime, QueryFilter, QuerySelect, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use super::{can_modify, ArticleData};
use crate::{auth::AuthenticatedUser, validation::ValidatedJson};

/// Errors that may occur during the article update.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ArticleUpdateError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Article does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "article not found")]
    ArticleNotFound,

    /// Provided category does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "category not found")]
    CategoryNotFound,

    /// Editors can't modify articles of other authors.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "editors can only modify their own articles")]
    NotAnAuthor,
}

/// Article update request.
///
/// Omitted fields are left unchanged.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct ArticleUpdateRequest {
    /// Article title.
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    #[schemars(example = "crate::schema::example_title")]
    title: Option<String>,

    /// Short description shown in feeds.
    #[serde(default)]
    #[validate(length(max = 500))]
    #[schemars(example = "crate::schema::example_excerpt")]
    excerpt: Option<String>,

    /// Article content.
    #[serde(default)]
    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_content")]
    content: Option<String>,

    /// Slug of the new article category.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_category_slug")]
    category: Option<String>,
}

/// Generate OAPI documentation for the [`update`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Edit an article.")
        .description("Editors can only edit their own articles.")
        .response::<200, Json<ArticleData>>()
}

/// Article update handler.
pub(super) async fn update(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<ArticleUpdateRequest>,
) -> Result<Json<ArticleData>, ArticleUpdateError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let article = article::Entity::find()
                .filter(article::Column::Slug.eq(slug))
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(ArticleUpdateError::ArticleNotFound)?;

            if !can_modify(&current_user, &article) {
                return Err(ArticleUpdateError::NotAnAuthor);
            }

            let mut model: article::ActiveModel = article.into();

            if let Some(slug) = request.category {
                let category_id: i64 = category::Entity::find()
                    .select_only()
                    .column(category::Column::Id)
                    .filter(category::Column::Slug.eq(slug))
                    .into_tuple()
                    .one(txn)
                    .await?
                    .ok_or(ArticleUpdateError::CategoryNotFound)?;

                model.category_id = ActiveValue::Set(Some(category_id));
            }

            if let Some(title) = request.title {
                model.title = ActiveValue::Set(title);
            }

            if let Some(excerpt) = request.excerpt {
                model.excerpt = ActiveValue::Set(excerpt);
            }

            if let Some(content) = request.content {
                model.content = ActiveValue::Set(content);
            }

            model.updated_at = ActiveValue::Set(timestamp(OffsetDateTime::now_utc()));

            let model = model.update(txn).await?;

            Ok(Json(ArticleData::from(model)))
        })
    })
    .await
    .into_raw_result()
}
