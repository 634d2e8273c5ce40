//! 健康检查处理器

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{error, warn};

use fitness_shared::database::Database;

use crate::state::AppState;

const SERVICE_NAME: &str = "fitness-service";

/// 存活探针：服务进程正常即返回 ok
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// 就绪探针：检查数据库连接是否可用
///
/// GET /ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = match Database::from_pool(state.pool.clone()).health_check().await {
        Ok(()) => true,
        Err(e) if e.is_retryable() => {
            warn!(code = e.code(), error = %e, "Database not ready");
            false
        }
        Err(e) => {
            error!(code = e.code(), error = %e, "Database health check failed");
            false
        }
    };
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if db_ok { "ok" } else { "degraded" },
            "service": SERVICE_NAME,
            "checks": {
                "database": if db_ok { "ok" } else { "fail" }
            }
        })),
    )
}
