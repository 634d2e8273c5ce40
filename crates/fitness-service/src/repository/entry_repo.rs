//! 每日记录仓储

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use super::DateRange;
use crate::error::Result;
use crate::models::DailyEntry;

const ENTRY_COLUMNS: &str = "id, date, weight, calories, created_at, updated_at";

/// 每日记录仓储
pub struct EntryRepository {
    pool: SqlitePool,
}

impl EntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 列出全部记录，日期倒序
    pub async fn list(&self) -> Result<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// 按日期区间列出记录，日期正序
    pub async fn list_in_range(&self, range: DateRange) -> Result<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM daily_entries
            WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
            ORDER BY date ASC
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// 列出原始行，按 ID 排序
    pub async fn list_raw(&self) -> Result<Vec<DailyEntry>> {
        let entries = sqlx::query_as::<_, DailyEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DailyEntry>> {
        let entry = sqlx::query_as::<_, DailyEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyEntry>> {
        let entry = sqlx::query_as::<_, DailyEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE date = ?"
        ))
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// 新建记录
    ///
    /// 日期唯一约束由数据库保证，冲突时返回 sqlx 的唯一约束错误
    pub async fn insert(
        &self,
        date: NaiveDate,
        weight: Option<f64>,
        calories: Option<f64>,
    ) -> Result<DailyEntry> {
        let now = Utc::now();
        let entry = sqlx::query_as::<_, DailyEntry>(&format!(
            r#"
            INSERT INTO daily_entries (date, weight, calories, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(date)
        .bind(weight)
        .bind(calories)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// 整体替换体重与热量，记录不存在时返回 None
    pub async fn update(
        &self,
        id: i64,
        weight: Option<f64>,
        calories: Option<f64>,
    ) -> Result<Option<DailyEntry>> {
        let entry = sqlx::query_as::<_, DailyEntry>(&format!(
            r#"
            UPDATE daily_entries
            SET weight = ?, calories = ?, updated_at = ?
            WHERE id = ?
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(weight)
        .bind(calories)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// 删除记录，返回级联删除的运动记录数；记录不存在时返回 None
    pub async fn delete(&self, id: i64) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let (exercise_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM exercises WHERE entry_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM daily_entries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;

        Ok(Some(exercise_count as u64))
    }
}
