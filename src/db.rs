use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::model::Workout;

pub async fn setup_pool() -> Result<SqlitePool> {
    dotenv().ok();
    let db_url = env::var("DATABASE_URL").context("DATABASE_URL env var must be set!")?;
    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    Ok(SqlitePoolOptions::new().connect_with(options).await?)
}

pub async fn setup_db(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS workouts(
            id INTEGER PRIMARY KEY,
            sport TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            location_name TEXT NOT NULL)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn read_workout(pool: &SqlitePool, id: i64) -> Result<Workout> {
    Ok(
        sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?,
    )
}

pub async fn read_all_workouts(pool: &SqlitePool) -> Result<Vec<Workout>> {
    Ok(
        sqlx::query_as::<_, Workout>("SELECT * FROM workouts ORDER BY id")
            .fetch_all(pool)
            .await?,
    )
}

/// Inserts a new workout and returns the id sqlite assigned to it.
pub async fn write_workout(pool: &SqlitePool, workout: &Workout) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO workouts(sport, description, date, end_date, location_name)
        VALUES(?, ?, ?, ?, ?)",
    )
    .bind(&workout.sport)
    .bind(&workout.description)
    .bind(workout.date)
    .bind(workout.end_date)
    .bind(&workout.location_name)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Returns the number of rows touched so callers can tell a missing id apart
/// from a successful update.
pub async fn update_workout(pool: &SqlitePool, workout: &Workout) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE workouts SET sport=?, description=?, date=?, end_date=?, location_name=?
        WHERE id=?",
    )
    .bind(&workout.sport)
    .bind(&workout.description)
    .bind(workout.date)
    .bind(workout.end_date)
    .bind(&workout.location_name)
    .bind(workout.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_workout(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM workouts WHERE id=?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
