//! 运动记录仓储

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::DateRange;
use crate::error::Result;
use crate::models::Exercise;

const EXERCISE_COLUMNS: &str = "id, date, type, details, entry_id, created_at, updated_at";

/// 运动记录仓储
pub struct ExerciseRepository {
    pool: SqlitePool,
}

impl ExerciseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 按每日记录 ID 列出运动
    pub async fn list_by_entry(&self, entry_id: i64) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE entry_id = ? ORDER BY id ASC"
        ))
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// 按日期列出运动
    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE date = ? ORDER BY id ASC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// 按所属每日记录的日期过滤，按 (entry_id, id) 排序
    pub async fn list_by_entry_date(&self, range: DateRange) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT e.id, e.date, e.type, e.details, e.entry_id, e.created_at, e.updated_at
            FROM exercises e
            JOIN daily_entries d ON d.id = e.entry_id
            WHERE (?1 IS NULL OR d.date >= ?1) AND (?2 IS NULL OR d.date <= ?2)
            ORDER BY e.entry_id ASC, e.id ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    /// 列出原始行，按 ID 排序
    pub async fn list_raw(&self) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn insert(
        &self,
        entry_id: i64,
        date: NaiveDate,
        exercise_type: &str,
        details: &str,
    ) -> Result<Exercise> {
        let now = Utc::now();
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            INSERT INTO exercises (date, type, details, entry_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(date)
        .bind(exercise_type)
        .bind(details)
        .bind(entry_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exercise)
    }

    /// 更新类型与描述，`details` 为 None 时保留原值；记录不存在时返回 None
    pub async fn update(
        &self,
        id: i64,
        exercise_type: &str,
        details: Option<&str>,
    ) -> Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            UPDATE exercises
            SET type = ?, details = COALESCE(?, details), updated_at = ?
            WHERE id = ?
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(exercise_type)
        .bind(details)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exercise)
    }

    /// 删除运动记录，返回是否删除成功
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
