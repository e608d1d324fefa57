use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{category, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use derive_more::{Display, Error, From};

use super::CategoryData;

/// Errors that may occur during the category list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum CategoryListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of article categories.")
        .response::<200, Json<Vec<CategoryData>>>()
}

/// List all categories ordered by name.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<CategoryData>>, CategoryListError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&*db)
        .await?;

    Ok(Json(categories.into_iter().map(CategoryData::from).collect()))
}
