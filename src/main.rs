use cheese_api::config::Config;
use cheese_api::routes::{AppState, router};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = Config::from_env();
    let db: DatabaseConnection = Database::connect(&config.database_url).await?;

    db.execute(sea_orm::Statement::from_string(
        db.get_database_backend(),
        r"CREATE TABLE IF NOT EXISTS cheese_listings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            is_published BOOLEAN NOT NULL DEFAULT FALSE
        );"
        .to_owned(),
    ))
    .await?;

    let state = AppState {
        db,
        page_size: config.page_size,
    };
    let app = axum::Router::new()
        .nest("/api", router(state))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
