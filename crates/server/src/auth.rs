use std::sync::Arc;

use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{
    token, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, OffsetDateTime, QueryFilter,
    QuerySelect,
};
use derive_more::{Display, Error, From};
use entitlement::Role;

/// Identity of the user that executes the request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: i64,
    role: Role,
    token_id: i64,
}

impl AuthenticatedUser {
    /// Get raw user identifier value.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Role of the user at the moment of authentication.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Identifier of the authentication token used for the current request.
    pub fn token_id(&self) -> i64 {
        self.token_id
    }
}

/// Optional identity, available on routes that can be accessed by guests.
#[derive(Copy, Clone, Debug)]
pub struct CurrentReader(pub Option<AuthenticatedUser>);

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "invalid authentication token was provided")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "only administrators and editors can access")]
    StaffRequired,
}

/// Find the user that owns an unexpired authentication token.
async fn authenticate(
    db: &DatabaseConnection,
    bearer: &str,
) -> Result<Option<AuthenticatedUser>, DbErr> {
    let found = token::Entity::find()
        .select_only()
        .columns([
            token::Column::Id,
            token::Column::CreatedAt,
            token::Column::UserId,
        ])
        .column(user::Column::Role)
        .inner_join(user::Entity)
        .filter(token::Column::Token.eq(bearer))
        .into_tuple::<(i64, db::PrimitiveDateTime, i64, Role)>()
        .one(db)
        .await?;

    Ok(found.and_then(|(token_id, created_at, id, role)| {
        (!token::is_expired(created_at, OffsetDateTime::now_utc())).then_some(AuthenticatedUser {
            id,
            role,
            token_id,
        })
    }))
}

pub(super) async fn require_authentication<const REQUIRE_STAFF: bool, B>(
    State(db): State<Arc<DatabaseConnection>>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let user = authenticate(&db, authorization.token())
        .await?
        .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

    if REQUIRE_STAFF && !user.role.is_staff() {
        return Err(AuthenticationError::StaffRequired);
    }

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Identify the reader if an authentication token was provided.
///
/// Missing, unknown and expired tokens are all treated as guest access.
pub(super) async fn identify_reader<B>(
    State(db): State<Arc<DatabaseConnection>>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let user = match authorization {
        Some(TypedHeader(authorization)) => authenticate(&db, authorization.token()).await?,
        None => None,
    };

    req.extensions_mut().insert(CurrentReader(user));

    Ok(next.run(req).await)
}
