use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    category, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SelectExt, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use entitlement::Role;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::CategoryData;
use crate::{
    auth::AuthenticatedUser,
    schema::example_error,
    validation::{ValidatedJson, SLUG_REGEX},
};

/// Errors that may occur during the category creation.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum CategoryCreationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Only administrators may manage categories.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "only administrators can manage categories")]
    AdminRequired,

    /// Category with the same slug already exists.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "category already exists")]
    AlreadyExists,
}

/// Category creation request.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct CategoryCreationRequest {
    /// Category name.
    #[validate(length(min = 1, max = 64))]
    #[schemars(example = "crate::schema::example_category_name")]
    name: String,

    /// URL-friendly category identifier.
    #[validate(length(max = 64), regex = "SLUG_REGEX")]
    #[schemars(example = "crate::schema::example_category_slug")]
    slug: String,
}

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create new category.")
        .response::<200, Json<CategoryData>>()
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Category with the same slug already exists.")
                .example(example_error(CategoryCreationError::AlreadyExists))
        })
}

/// Category creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<CategoryCreationRequest>,
) -> Result<Json<CategoryData>, CategoryCreationError> {
    if current_user.role() != Role::Admin {
        return Err(CategoryCreationError::AdminRequired);
    }

    db.transaction(|txn| {
        Box::pin(async move {
            let exists = category::Entity::find()
                .select_only()
                .filter(category::Column::Slug.eq(request.slug.as_str()))
                .exists(txn)
                .await?;

            if exists {
                return Err(CategoryCreationError::AlreadyExists);
            }

            let model = category::Entity::insert(category::ActiveModel {
                name: ActiveValue::Set(request.name),
                slug: ActiveValue::Set(request.slug),
                ..Default::default()
            })
            .exec_with_returning(txn)
            .await?;

            Ok(Json(CategoryData::from(model)))
        })
    })
    .await
    .into_raw_result()
}
