use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    article, timestamp, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, OffsetDateTime, QueryFilter, QuerySelect, TransactionErrorExt, TransactionTrait,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{can_modify, ArticleData};
use crate::{auth::AuthenticatedUser, schema::example_error};

/// Errors that may occur during the publication status change.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ArticleStatusError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Article does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "article not found")]
    ArticleNotFound,

    /// Editors can't modify articles of other authors.
    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "editors can only modify their own articles")]
    NotAnAuthor,

    /// Scheduled publication time is missing or is not in the future.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "scheduled articles require a publication time in the future")]
    InvalidSchedule,
}

/// Publication status change request.
#[derive(Deserialize, JsonSchema)]
pub(super) struct ArticleStatusRequest {
    /// New publication status.
    #[schemars(example = "crate::schema::example_article_status")]
    status: article::Status,

    /// Publication time as a UNIX timestamp, required for scheduled articles.
    #[serde(default)]
    #[schemars(example = "crate::schema::example_timestamp")]
    scheduled_at: Option<i64>,
}

/// Generate OAPI documentation for the [`status`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Change article publication status.")
        .description(
            r#"Published articles become visible to readers right away. Scheduled
articles are published once their publication time has passed. Moving an
article back to drafts unpublishes it."#,
        )
        .response::<200, Json<ArticleData>>()
        .response_with::<422, Json<Value>, _>(|op| {
            op.description("Invalid publication time.")
                .example(example_error(ArticleStatusError::InvalidSchedule))
        })
}

/// Publication status change handler.
pub(super) async fn status(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    Path(slug): Path<String>,
    Json(request): Json<ArticleStatusRequest>,
) -> Result<Json<ArticleData>, ArticleStatusError> {
    let now = OffsetDateTime::now_utc();

    let scheduled_at = match (request.status, request.scheduled_at) {
        (article::Status::Scheduled, Some(at)) => {
            let at = OffsetDateTime::from_unix_timestamp(at)
                .map_err(|_| ArticleStatusError::InvalidSchedule)?;

            if at <= now {
                return Err(ArticleStatusError::InvalidSchedule);
            }

            Some(timestamp(at))
        }
        (article::Status::Scheduled, None) => return Err(ArticleStatusError::InvalidSchedule),
        _ => None,
    };

    db.transaction(|txn| {
        Box::pin(async move {
            let article = article::Entity::find()
                .filter(article::Column::Slug.eq(slug))
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or(ArticleStatusError::ArticleNotFound)?;

            if !can_modify(&current_user, &article) {
                return Err(ArticleStatusError::NotAnAuthor);
            }

            let published_at = match request.status {
                article::Status::Published => article.published_at.or(Some(timestamp(now))),
                article::Status::Draft | article::Status::Scheduled => None,
            };

            let previous_status = article.status;

            let mut model: article::ActiveModel = article.into();
            model.status = ActiveValue::Set(request.status);
            model.scheduled_at = ActiveValue::Set(scheduled_at);
            model.published_at = ActiveValue::Set(published_at);
            model.updated_at = ActiveValue::Set(timestamp(now));

            let model = model.update(txn).await?;

            info!(
                article_id = model.id,
                from = ?previous_status,
                to = ?model.status,
                "article status changed"
            );

            Ok(Json(ArticleData::from(model)))
        })
    })
    .await
    .into_raw_result()
}
