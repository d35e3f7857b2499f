use std::env;

use anyhow::Result;
use sqlx::sqlite::SqlitePool;

use sweatlog::api;
use sweatlog::db;
use sweatlog::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = get_subscriber("sweatlog".into(), "info".into());
    init_subscriber(subscriber);

    let pool = db::setup_pool().await?;
    db::setup_db(&pool).await?;
    run(pool).await;

    Ok(())
}

async fn run(pool: SqlitePool) {
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3333);

    tracing::info!("listening on port {}", port);
    warp::serve(api::routes(pool)).run(([0, 0, 0, 0], port)).await;
}
