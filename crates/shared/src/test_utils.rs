//! 测试工具模块
//!
//! 提供集成测试所需的数据库辅助函数和测试数据构造器。
//! 每次调用都创建独立的内存数据库，测试之间互不干扰，无需外部服务。

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::database::Database;

// ==================== 测试配置辅助 ====================

/// 创建测试用数据库配置
///
/// 优先使用 TEST_DATABASE_URL，否则使用内存数据库
pub fn test_database_config() -> DatabaseConfig {
    DatabaseConfig {
        url: std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: 300,
    }
}

/// 创建已完成迁移的测试数据库
pub async fn test_database() -> Database {
    let db = Database::connect(&test_database_config())
        .await
        .expect("连接测试数据库失败");
    db.run_migrations().await.expect("测试数据库迁移失败");
    db
}

/// 创建已完成迁移的测试连接池
pub async fn test_pool() -> SqlitePool {
    test_database().await.pool().clone()
}

// ==================== 测试数据构造 ====================

/// 返回今天往前数 `days_ago` 天的日期
pub fn days_ago(days_ago: i64) -> NaiveDate {
    (Utc::now() - Duration::days(days_ago)).date_naive()
}

/// 直接插入一条每日记录，返回其 ID
pub async fn insert_entry(
    pool: &SqlitePool,
    date: &str,
    weight: Option<f64>,
    calories: Option<f64>,
) -> i64 {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO daily_entries (date, weight, calories, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(date)
    .bind(weight)
    .bind(calories)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("插入测试每日记录失败")
    .last_insert_rowid()
}

/// 直接插入一条运动记录，返回其 ID
pub async fn insert_exercise(
    pool: &SqlitePool,
    entry_id: i64,
    date: &str,
    exercise_type: &str,
    details: &str,
) -> i64 {
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO exercises (date, type, details, entry_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(date)
    .bind(exercise_type)
    .bind(details)
    .bind(entry_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("插入测试运动记录失败")
    .last_insert_rowid()
}

/// 统计表行数
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("统计行数失败");
    count
}
