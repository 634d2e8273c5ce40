//! 每日记录实体

use chrono::{DateTime, NaiveDate, Utc};

/// 每日记录
///
/// 每个日期最多一条，记录当天体重与摄入热量
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DailyEntry {
    pub id: i64,
    pub date: NaiveDate,
    /// 体重（kg）
    pub weight: Option<f64>,
    /// 摄入热量（kcal）
    pub calories: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
