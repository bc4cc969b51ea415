use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::{Router, extract::State, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .with_state(state)
}

/// The router wrapped in request tracing and CORS.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(cors_origins)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn parse_course_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid course id".to_string()))
}

fn read_payload(payload: Result<Json<CourseRequest>, JsonRejection>) -> Result<NewCourse, AppError> {
    let Json(req) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    req.validate()
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await.map_err(AppError::store("reach the database"))?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state
        .store
        .list_all()
        .await
        .map_err(AppError::store("fetch courses"))?;
    Ok(Json(courses))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let id = parse_course_id(&id)?;
    let course = state
        .store
        .get_by_id(id)
        .await
        .map_err(AppError::store("fetch course"))?
        .ok_or_else(|| {
            debug!("course {} not found", id);
            AppError::NotFound
        })?;
    Ok(Json(course))
}

async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let new_course = read_payload(payload)?;
    let id = state
        .store
        .insert(&new_course)
        .await
        .map_err(AppError::store("create course"))?;

    info!("created course {} ({})", id, new_course.course_code);
    Ok((StatusCode::CREATED, Json(new_course.with_id(id))))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<Json<Course>, AppError> {
    let id = parse_course_id(&id)?;
    let course = read_payload(payload)?;
    let changed = state
        .store
        .update(id, &course)
        .await
        .map_err(AppError::store("update course"))?;

    if changed == 0 {
        debug!("course {} not found for update", id);
        return Err(AppError::NotFound);
    }

    info!("updated course {}", id);
    Ok(Json(course.with_id(id)))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_course_id(&id)?;
    let deleted = state
        .store
        .delete_by_id(id)
        .await
        .map_err(AppError::store("delete course"))?;

    if deleted == 0 {
        debug!("course {} not found for delete", id);
        return Err(AppError::NotFound);
    }

    info!("deleted course {}", id);
    Ok(StatusCode::NO_CONTENT)
}
