mod auth;
mod handlers;
mod pagination;
mod password;
mod schema;
mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router, Server};
use common::{config::Config, logging};
use db::{Database, DatabaseConnection};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::new(None)?;

    logging::init(&config);

    let Some(server_config) = config.server.as_ref() else {
        return Err(anyhow::Error::msg("unable to load server config"));
    };

    info!("connecting to database");
    let database = Arc::new(Database::connect(&config.database.url).await?);
    let server = Server::bind(&server_config.address);

    info!(address = %server_config.address, "starting api server");
    let config = Arc::new(config);

    server
        .serve(app_router(database, config).into_make_service())
        .await?;

    Ok(())
}

fn app_router(database: Arc<DatabaseConnection>, config: Arc<Config>) -> Router {
    let mut api = OpenApi::default();

    let mut router = ApiRouter::new()
        .nest("/auth", handlers::auth::routes(database.clone()))
        .nest("/me", handlers::me::routes(database.clone()))
        .nest("/plans", handlers::plans::routes())
        .nest("/categories", handlers::categories::routes(database.clone()))
        .nest("/articles", handlers::articles::routes(database.clone()))
        .nest("/bookmarks", handlers::bookmarks::routes(database.clone()))
        .nest("/following", handlers::following::routes(database.clone()))
        .nest("/users", handlers::users::routes(database.clone()));

    let docs = config
        .server
        .as_ref()
        .map(|server| server.docs)
        .unwrap_or_default();

    if docs {
        router = router.nest("/docs", handlers::docs::routes());
    }

    router
        .finish_api_with(&mut api, |api| {
            api.title("usethinkup API")
                .description("Articles, subscriptions and reader entitlements.")
        })
        .layer(Extension(Arc::new(api)))
        .layer(Extension(config))
        .with_state(database)
}
