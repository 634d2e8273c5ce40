//! 每日记录 API 处理器
//!
//! 实现每日记录的 CRUD、导出和导入

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use fitness_shared::observability::metrics;

use crate::{
    dto::{
        ApiResponse, CreateDailyEntryRequest, DailyEntryDto, DeletedEntryDto, ImportSummaryDto,
        UpdateDailyEntryRequest, parse_date,
    },
    error::{Result, ServiceError},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

/// 获取全部每日记录（日期倒序）
///
/// GET /api/daily-entries
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyEntryDto>>>> {
    let entries = state.entry_repo().list().await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(Into::into).collect(),
    )))
}

/// 按日期获取每日记录
///
/// GET /api/daily-entries/date/{date}
pub async fn get_entry_by_date(
    State(state): State<AppState>,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<ApiResponse<DailyEntryDto>>> {
    let date = parse_date(&date)?;
    let entry = state
        .entry_repo()
        .find_by_date(date)
        .await?
        .ok_or_else(|| ServiceError::EntryNotFoundForDate(date.to_string()))?;

    Ok(Json(ApiResponse::success(entry.into())))
}

/// 获取每日记录详情
///
/// GET /api/daily-entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<DailyEntryDto>>> {
    let entry = state
        .entry_repo()
        .find_by_id(id)
        .await?
        .ok_or(ServiceError::EntryNotFound(id))?;

    Ok(Json(ApiResponse::success(entry.into())))
}

/// 创建每日记录
///
/// POST /api/daily-entries
///
/// 同一日期只允许一条记录，冲突时返回 409 并附带已有记录的 ID
pub async fn create_entry(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDailyEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DailyEntryDto>>)> {
    req.validate()?;
    let date = req.parsed_date()?;
    let repo = state.entry_repo();

    if let Some(existing) = repo.find_by_date(date).await? {
        return Err(ServiceError::EntryAlreadyExists {
            date: date.to_string(),
            entry_id: existing.id,
        });
    }

    let entry = match repo.insert(date, req.weight, req.calories).await {
        Ok(entry) => entry,
        // 并发创建同一日期时由唯一约束兜底
        Err(ServiceError::Database(sqlx::Error::Database(db_err)))
            if db_err.is_unique_violation() =>
        {
            let existing = repo.find_by_date(date).await?.ok_or_else(|| {
                ServiceError::Internal(format!("日期 {} 唯一约束冲突但记录不存在", date))
            })?;
            return Err(ServiceError::EntryAlreadyExists {
                date: date.to_string(),
                entry_id: existing.id,
            });
        }
        Err(e) => return Err(e),
    };

    metrics::record_write("daily_entry", "create");
    info!(entry_id = entry.id, date = %entry.date, "Daily entry created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(entry.into(), "记录已创建")),
    ))
}

/// 更新每日记录
///
/// PUT /api/daily-entries/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateDailyEntryRequest>,
) -> Result<Json<ApiResponse<DailyEntryDto>>> {
    req.validate()?;

    let entry = state
        .entry_repo()
        .update(id, req.weight, req.calories)
        .await?
        .ok_or(ServiceError::EntryNotFound(id))?;

    metrics::record_write("daily_entry", "update");
    info!(entry_id = id, "Daily entry updated");

    Ok(Json(ApiResponse::success_with_message(entry.into(), "记录已更新")))
}

/// 删除每日记录，级联删除当天的运动记录
///
/// DELETE /api/daily-entries/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<DeletedEntryDto>>> {
    let deleted_exercises = state
        .entry_repo()
        .delete(id)
        .await?
        .ok_or(ServiceError::EntryNotFound(id))?;

    metrics::record_write("daily_entry", "delete");
    info!(entry_id = id, deleted_exercises, "Daily entry deleted");

    Ok(Json(ApiResponse::success_with_message(
        DeletedEntryDto {
            id,
            deleted_exercises,
        },
        "记录已删除",
    )))
}

/// 导出全部数据为备份文件
///
/// GET /api/daily-entries/export/all
pub async fn export_all(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let document = state.data_transfer().export().await?;

    let disposition = format!(
        "attachment; filename=\"fitness-tracker-backup-{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(document)))
}

/// 导入备份文件，整体替换现有数据
///
/// POST /api/daily-entries/import
pub async fn import_entries(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<ImportSummaryDto>>> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Import body rejected");
        ServiceError::InvalidImport(rejection.body_text())
    })?;

    let summary = state.data_transfer().import(payload).await?;

    Ok(Json(ApiResponse::success_with_message(summary, "数据导入成功")))
}

/// 每日记录表原始行
///
/// GET /api/daily-entries/raw
pub async fn raw_entries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyEntryDto>>>> {
    let entries = state.entry_repo().list_raw().await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(Into::into).collect(),
    )))
}
