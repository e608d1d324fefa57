use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    follow, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PrimitiveDateTime, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use derive_more::{Display, Error, From};
use futures_util::TryStreamExt;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{auth::AuthenticatedUser, pagination::Pagination};

/// A single followed writer data.
#[derive(Serialize, JsonSchema)]
pub(super) struct FollowData {
    /// Writer's user identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    author_id: i64,

    /// Writer's displayed name.
    #[schemars(example = "crate::schema::example_display_name")]
    display_name: String,

    /// Time when the writer was followed, as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    timestamp: i64,
}

/// Errors that may occur during the followed writers list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum FollowListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of followed writers.")
        .response::<200, Json<Vec<FollowData>>>()
}

/// List writers followed by the current user.
pub(super) async fn list(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<FollowData>>, FollowListError> {
    follow::Entity::find()
        .select_only()
        .column(follow::Column::AuthorId)
        .column(user::Column::DisplayName)
        .column(follow::Column::CreatedAt)
        .join(JoinType::InnerJoin, follow::Relation::Author.def())
        .filter(follow::Column::FollowerId.eq(current_user.id()))
        .order_by_desc(follow::Column::CreatedAt)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .into_tuple::<(i64, String, PrimitiveDateTime)>()
        .stream(&*db)
        .await?
        .map_ok(|(author_id, display_name, created_at)| FollowData {
            author_id,
            display_name,
            timestamp: created_at.assume_utc().unix_timestamp(),
        })
        .err_into()
        .try_collect()
        .await
        .map(Json)
}
