use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    article, category, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use super::ArticleData;
use crate::{
    auth::AuthenticatedUser,
    schema::example_error,
    validation::{ValidatedJson, SLUG_REGEX},
};

/// Errors that may occur during the article creation.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ArticleCreationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Article with the same slug already exists.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "article already exists")]
    AlreadyExists,

    /// Provided category does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "category not found")]
    CategoryNotFound,
}

/// Article creation request.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct ArticleCreationRequest {
    /// URL-friendly article identifier.
    #[validate(length(max = 128), regex = "SLUG_REGEX")]
    #[schemars(example = "crate::schema::example_slug")]
    slug: String,

    /// Article title.
    #[validate(length(min = 1, max = 200))]
    #[schemars(example = "crate::schema::example_title")]
    title: String,

    /// Short description shown in feeds.
    #[validate(length(max = 500))]
    #[schemars(example = "crate::schema::example_excerpt")]
    excerpt: String,

    /// Article content.
    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_content")]
    content: String,

    /// Slug of the article category.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_category_slug")]
    category: Option<String>,
}

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create new article draft.")
        .description("Created articles are not visible to readers until they are published.")
        .response::<200, Json<ArticleData>>()
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Article with the same slug already exists.")
                .example(example_error(ArticleCreationError::AlreadyExists))
        })
}

/// Article creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ArticleCreationRequest>,
) -> Result<Json<ArticleData>, ArticleCreationError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let exists = article::Entity::find()
                .select_only()
                .filter(article::Column::Slug.eq(request.slug.as_str()))
                .exists(txn)
                .await?;

            if exists {
                return Err(ArticleCreationError::AlreadyExists);
            }

            let category_id = match request.category {
                Some(slug) => Some(
                    category::Entity::find()
                        .select_only()
                        .column(category::Column::Id)
                        .filter(category::Column::Slug.eq(slug))
                        .into_tuple::<i64>()
                        .one(txn)
                        .await?
                        .ok_or(ArticleCreationError::CategoryNotFound)?,
                ),
                None => None,
            };

            let model = article::Entity::insert(article::ActiveModel {
                author_id: ActiveValue::Set(current_user.id()),
                category_id: ActiveValue::Set(category_id),
                slug: ActiveValue::Set(request.slug),
                title: ActiveValue::Set(request.title),
                excerpt: ActiveValue::Set(request.excerpt),
                content: ActiveValue::Set(request.content),
                status: ActiveValue::Set(article::Status::Draft),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            info!(
                article_id = model.id,
                author_id = model.author_id,
                "created article draft"
            );

            Ok(Json(ArticleData::from(model)))
        })
    })
    .await
    .into_raw_result()
}
