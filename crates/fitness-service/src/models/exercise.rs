//! 运动记录实体

use chrono::{DateTime, NaiveDate, Utc};

/// 运动记录
///
/// 归属于某条每日记录，删除每日记录时级联删除
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Exercise {
    pub id: i64,
    pub date: NaiveDate,
    /// 运动类型（如 Running、Bench Press）
    #[sqlx(rename = "type")]
    pub exercise_type: String,
    /// 自由文本描述，如 "5km" 或 "3 sets of 10"
    pub details: String,
    pub entry_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
