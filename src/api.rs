use std::convert::Infallible;

use anyhow::Result;
use lazy_static::lazy_static;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use warp::http::StatusCode;
use warp::reply::Reply;
use warp::Filter;

use crate::db;
use crate::model::Workout;

/// Canonical error payload shared by every endpoint. Concrete handlers pick
/// the status code; the body shape and wording are fixed here.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub static ENTITY_NOT_FOUND: &str = "Entity ID does not exist.";
pub static WRONG_PARAMS: &str = "Bad request, check your parameters.";

lazy_static! {
    static ref NOT_FOUND_BODY: ErrorBody = ErrorBody {
        message: ENTITY_NOT_FOUND.to_string(),
    };
    static ref BAD_REQUEST_BODY: ErrorBody = ErrorBody {
        message: WRONG_PARAMS.to_string(),
    };
}

fn not_found() -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&*NOT_FOUND_BODY), StatusCode::NOT_FOUND)
        .into_response()
}

fn bad_request() -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&*BAD_REQUEST_BODY), StatusCode::BAD_REQUEST)
        .into_response()
}

fn json_body_workout() -> impl Filter<Extract = (Workout,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(1024 * 16).and(warp::body::json())
}

fn with_pool(
    pool: SqlitePool,
) -> impl Filter<Extract = (SqlitePool,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

/// Every route in one place, wrapped so the outgoing response is always
/// labelled JSON no matter what the handler produced. Rejections are
/// recovered into the canonical payloads first, so malformed bodies and
/// unmatched paths never fall through to warp's plain-text defaults.
pub fn routes(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    get_workouts(pool.clone())
        .or(get_workout(pool.clone()))
        .or(post_workout(pool.clone()))
        .or(update_workout(pool.clone()))
        .or(delete_workout(pool))
        .recover(handle_rejection)
        .with(warp::reply::with::header("Content-Type", "application/json"))
}

async fn handle_rejection(
    rejection: warp::Rejection,
) -> Result<warp::reply::Response, Infallible> {
    if rejection.is_not_found() {
        Ok(not_found())
    } else {
        Ok(bad_request())
    }
}

// Filters
pub fn get_workouts(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("workouts")
        .and(warp::get())
        .and(with_pool(pool))
        .and_then(list_workouts)
}

pub fn get_workout(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("workout" / i64)
        .and(warp::get())
        .and(with_pool(pool))
        .and_then(read_workout_handler)
}

pub fn post_workout(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("workout")
        .and(warp::post())
        .and(json_body_workout())
        .and(with_pool(pool))
        .and_then(new_workout)
}

pub fn update_workout(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("update_workout")
        .and(warp::post())
        .and(json_body_workout())
        .and(with_pool(pool))
        .and_then(update_workout_handler)
}

pub fn delete_workout(
    pool: SqlitePool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path!("delete_workout" / i64)
        .and(warp::post())
        .and(with_pool(pool))
        .and_then(delete_workout_handler)
}

// Handlers
async fn list_workouts(pool: SqlitePool) -> Result<warp::reply::Response, Infallible> {
    match db::read_all_workouts(&pool).await {
        Ok(workouts) => Ok(warp::reply::json(&workouts).into_response()),
        Err(e) => {
            tracing::error!("failed to list workouts: {:?}", e);
            Ok(bad_request())
        }
    }
}

async fn read_workout_handler(id: i64, pool: SqlitePool) -> Result<warp::reply::Response, Infallible> {
    match db::read_workout(&pool, id).await {
        Ok(workout) => Ok(warp::reply::json(&workout).into_response()),
        Err(_) => Ok(not_found()),
    }
}

async fn new_workout(workout: Workout, pool: SqlitePool) -> Result<warp::reply::Response, Infallible> {
    if !workout.is_valid() {
        return Ok(bad_request());
    }

    match db::write_workout(&pool, &workout).await {
        Ok(id) => {
            let created = Workout {
                id: Some(id),
                ..workout
            };
            Ok(
                warp::reply::with_status(warp::reply::json(&created), StatusCode::CREATED)
                    .into_response(),
            )
        }
        Err(e) => {
            tracing::error!("failed to create workout: {:?}", e);
            Ok(bad_request())
        }
    }
}

async fn update_workout_handler(
    workout: Workout,
    pool: SqlitePool,
) -> Result<warp::reply::Response, Infallible> {
    if workout.id.is_none() || !workout.is_valid() {
        return Ok(bad_request());
    }

    match db::update_workout(&pool, &workout).await {
        Ok(0) => Ok(not_found()),
        Ok(_) => Ok(warp::reply::json(&workout).into_response()),
        Err(e) => {
            tracing::error!("failed to update workout: {:?}", e);
            Ok(bad_request())
        }
    }
}

async fn delete_workout_handler(id: i64, pool: SqlitePool) -> Result<warp::reply::Response, Infallible> {
    match db::delete_workout(&pool, id).await {
        Ok(0) => Ok(not_found()),
        Ok(_) => Ok(warp::reply::json(&serde_json::json!({
            "message": "Workout deleted."
        }))
        .into_response()),
        Err(e) => {
            tracing::error!("failed to delete workout: {:?}", e);
            Ok(bad_request())
        }
    }
}
