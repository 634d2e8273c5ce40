//! 原始数据 API 处理器

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    dto::{ApiResponse, DataDumpDto, RawDataFormat, RawDataParams},
    error::Result,
    extract::ApiQuery,
    state::AppState,
};

/// 扁平化的原始数据，支持 JSON 和 CSV
///
/// GET /api/raw-data?format=json|csv&includeMetadata=bool&startDate&endDate
pub async fn raw_data(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<RawDataParams>,
) -> Result<Response> {
    let format = params.format()?;
    let range = params.range()?;
    let include_metadata = params.include_metadata();
    let service = state.raw_data();

    match format {
        RawDataFormat::Json => {
            let records = service.records(range, include_metadata).await?;
            Ok(Json(ApiResponse::success(records)).into_response())
        }
        RawDataFormat::Csv => {
            let body = service.csv(range, include_metadata).await?;
            let disposition = format!(
                "attachment; filename=\"fitness-raw-data-{}.csv\"",
                Utc::now().format("%Y-%m-%d")
            );
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response())
        }
    }
}

/// 两张表的全部原始行
///
/// GET /api/data/dump
pub async fn dump(State(state): State<AppState>) -> Result<Json<ApiResponse<DataDumpDto>>> {
    let dump = state.raw_data().dump().await?;
    Ok(Json(ApiResponse::success(dump)))
}
