//! 看板 API 处理器

use axum::{Json, extract::State};

use crate::{
    dto::{ApiResponse, DashboardDto, DateRangeParams},
    error::Result,
    extract::ApiQuery,
    state::AppState,
};

/// 看板图表数据
///
/// GET /api/dashboard?startDate&endDate
pub async fn get_dashboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DateRangeParams>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let range = params.range()?;
    let dashboard = state.dashboard().dashboard(range).await?;
    Ok(Json(ApiResponse::success(dashboard)))
}
