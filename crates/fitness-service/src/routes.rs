//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射，并组装完整应用

use std::path::Path;

use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::info;

use fitness_shared::config::ServerConfig;
use fitness_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 每日记录路由
pub fn daily_entry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/daily-entries",
            get(handlers::daily_entry::list_entries).post(handlers::daily_entry::create_entry),
        )
        .route(
            "/daily-entries/date/{date}",
            get(handlers::daily_entry::get_entry_by_date),
        )
        .route(
            "/daily-entries/export/all",
            get(handlers::daily_entry::export_all),
        )
        .route(
            "/daily-entries/import",
            post(handlers::daily_entry::import_entries),
        )
        .route("/daily-entries/raw", get(handlers::daily_entry::raw_entries))
        .route(
            "/daily-entries/{id}",
            get(handlers::daily_entry::get_entry)
                .put(handlers::daily_entry::update_entry)
                .delete(handlers::daily_entry::delete_entry),
        )
}

/// 运动记录路由
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", post(handlers::exercise::create_exercise))
        .route(
            "/exercises/entry/{entry_id}",
            get(handlers::exercise::list_by_entry),
        )
        .route(
            "/exercises/date/{date}",
            get(handlers::exercise::list_by_date),
        )
        .route("/exercises/raw", get(handlers::exercise::raw_exercises))
        .route(
            "/exercises/{id}",
            put(handlers::exercise::update_exercise)
                .delete(handlers::exercise::delete_exercise),
        )
}

/// 原始数据与看板路由
pub fn data_routes() -> Router<AppState> {
    Router::new()
        .route("/raw-data", get(handlers::raw_data::raw_data))
        .route("/data/dump", get(handlers::raw_data::dump))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
}

/// 构建完整的 API 路由（不含 `/api` 前缀）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(daily_entry_routes())
        .merge(exercise_routes())
        .merge(data_routes())
        .fallback(api_not_found)
}

/// 组装完整应用：API、健康检查、静态前端、CORS 与可观测性中间件
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    if let Some(dir) = server.static_dir.as_deref() {
        info!(static_dir = %dir, "Serving client bundle");
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(cors_layer(&server.cors_origins))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// CORS 配置：`*` 允许任意来源，否则按逗号分隔的来源列表
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.trim() == "*" {
        info!("CORS allowed_origins: * (all origins)");
        cors.allow_origin(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

async fn api_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "code": "NOT_FOUND",
            "message": "接口不存在",
            "data": null
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_construction() {
        let _entries = daily_entry_routes();
        let _exercises = exercise_routes();
        let _data = data_routes();
        let _api = api_routes();
    }

    #[test]
    fn test_cors_layer_variants() {
        let _any = cors_layer("*");
        let _list = cors_layer("http://localhost:5173, http://localhost:3000");
    }
}
