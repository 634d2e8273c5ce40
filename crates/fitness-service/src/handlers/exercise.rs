//! 运动记录 API 处理器

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use fitness_shared::observability::metrics;

use crate::{
    dto::{
        ApiResponse, CreateExerciseRequest, DeletedResponse, ExerciseDto, UpdateExerciseRequest,
        parse_date, required_type,
    },
    error::{Result, ServiceError},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

/// 获取某条每日记录下的运动
///
/// GET /api/exercises/entry/{entryId}
pub async fn list_by_entry(
    State(state): State<AppState>,
    ApiPath(entry_id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Vec<ExerciseDto>>>> {
    let exercises = state.exercise_repo().list_by_entry(entry_id).await?;
    Ok(Json(ApiResponse::success(
        exercises.into_iter().map(Into::into).collect(),
    )))
}

/// 获取某天的运动
///
/// GET /api/exercises/date/{date}
pub async fn list_by_date(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<ExerciseDto>>>> {
    let date = parse_date(&date)?;
    let exercises = state.exercise_repo().list_by_date(date).await?;
    Ok(Json(ApiResponse::success(
        exercises.into_iter().map(Into::into).collect(),
    )))
}

/// 创建运动记录
///
/// POST /api/exercises
///
/// 日期缺省或为空时取所属每日记录的日期，提供时必须与之一致
pub async fn create_exercise(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExerciseDto>>)> {
    req.validate()?;
    let exercise_type = required_type(req.exercise_type.as_deref())?;
    let entry_id = req
        .entry_id
        .ok_or_else(|| ServiceError::Validation("entryId 不能为空".to_string()))?;

    let entry = state
        .entry_repo()
        .find_by_id(entry_id)
        .await?
        .ok_or(ServiceError::EntryNotFound(entry_id))?;

    let date = match req.date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let date = parse_date(raw)?;
            if date != entry.date {
                return Err(ServiceError::Validation(format!(
                    "运动日期 {} 与每日记录日期 {} 不一致",
                    date, entry.date
                )));
            }
            date
        }
        _ => entry.date,
    };

    let exercise = state
        .exercise_repo()
        .insert(
            entry_id,
            date,
            &exercise_type,
            req.details.as_deref().unwrap_or_default(),
        )
        .await?;

    metrics::record_write("exercise", "create");
    info!(
        exercise_id = exercise.id,
        entry_id,
        exercise_type = %exercise.exercise_type,
        "Exercise created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(exercise.into(), "运动已添加")),
    ))
}

/// 更新运动记录
///
/// PUT /api/exercises/{id}
pub async fn update_exercise(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateExerciseRequest>,
) -> Result<Json<ApiResponse<ExerciseDto>>> {
    req.validate()?;
    let exercise_type = required_type(req.exercise_type.as_deref())?;

    let exercise = state
        .exercise_repo()
        .update(id, &exercise_type, req.details.as_deref())
        .await?
        .ok_or(ServiceError::ExerciseNotFound(id))?;

    metrics::record_write("exercise", "update");
    info!(exercise_id = id, "Exercise updated");

    Ok(Json(ApiResponse::success_with_message(exercise.into(), "运动已更新")))
}

/// 删除运动记录
///
/// DELETE /api/exercises/{id}
pub async fn delete_exercise(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<DeletedResponse>>> {
    if !state.exercise_repo().delete(id).await? {
        return Err(ServiceError::ExerciseNotFound(id));
    }

    metrics::record_write("exercise", "delete");
    info!(exercise_id = id, "Exercise deleted");

    Ok(Json(ApiResponse::success_with_message(
        DeletedResponse { id },
        "运动已删除",
    )))
}

/// 运动表原始行
///
/// GET /api/exercises/raw
pub async fn raw_exercises(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ExerciseDto>>>> {
    let exercises = state.exercise_repo().list_raw().await?;
    Ok(Json(ApiResponse::success(
        exercises.into_iter().map(Into::into).collect(),
    )))
}
