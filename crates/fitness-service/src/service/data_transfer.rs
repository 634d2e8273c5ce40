//! 数据导出/导入服务
//!
//! 导出：全部每日记录按日期正序，每条附带当天的运动记录。
//!
//! 导入流程：
//!
//! 1. 解析并校验整份数据（日期、ID 唯一性、运动类型） -> 2. 单事务内清空两张表
//!    -> 3. 写入每日记录 -> 4. 写入运动记录 -> 5. 提交
//!
//! 任一步失败事务回滚，原有数据保持不变。

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, instrument, warn};

use fitness_shared::observability::metrics;

use crate::dto::{
    ExerciseDto, ExportEntryDto, ImportEntry, ImportSummaryDto, parse_date, parse_timestamp,
};
use crate::error::{Result, ServiceError};
use crate::repository::{DateRange, EntryRepository, ExerciseRepository};

/// 校验通过、待写入的每日记录
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedEntry {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub calories: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exercises: Vec<PreparedExercise>,
}

/// 校验通过、待写入的运动记录
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedExercise {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub exercise_type: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 数据导出/导入服务
pub struct DataTransferService {
    pool: SqlitePool,
}

impl DataTransferService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 导出全部数据
    ///
    /// 两次查询后在内存中按 entry_id 分组
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<Vec<ExportEntryDto>> {
        let entries = EntryRepository::new(self.pool.clone())
            .list_in_range(DateRange::all())
            .await?;
        let exercises = ExerciseRepository::new(self.pool.clone()).list_raw().await?;

        let mut grouped: HashMap<i64, Vec<ExerciseDto>> = HashMap::new();
        for exercise in exercises {
            grouped
                .entry(exercise.entry_id)
                .or_default()
                .push(exercise.into());
        }

        let document: Vec<ExportEntryDto> = entries
            .into_iter()
            .map(|entry| ExportEntryDto {
                exercises: grouped.remove(&entry.id).unwrap_or_default(),
                entry: entry.into(),
            })
            .collect();

        metrics::record_export("json");
        info!(entries = document.len(), "Data exported");

        Ok(document)
    }

    /// 用导入数据整体替换现有数据
    #[instrument(skip(self, payload))]
    pub async fn import(&self, payload: Value) -> Result<ImportSummaryDto> {
        let started = Instant::now();

        // 1. 解析与校验，不触碰数据库
        let entries = match parse_import(payload).and_then(|items| prepare_import(&items)) {
            Ok(entries) => entries,
            Err(e) => {
                metrics::record_import("rejected", 0, started.elapsed().as_secs_f64());
                return Err(e);
            }
        };

        // 2-5. 单事务替换
        let mut tx = self.pool.begin().await?;
        let summary = match replace_all(&mut tx, &entries).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Import failed, rolling back");
                tx.rollback().await?;
                metrics::record_import("failed", 0, started.elapsed().as_secs_f64());
                return Err(e);
            }
        };
        tx.commit().await?;

        metrics::record_import("success", summary.entries, started.elapsed().as_secs_f64());
        info!(
            entries = summary.entries,
            exercises = summary.exercises,
            "Data imported"
        );

        Ok(summary)
    }
}

/// 将请求体解析为导入条目列表
pub fn parse_import(payload: Value) -> Result<Vec<ImportEntry>> {
    let Value::Array(items) = payload else {
        return Err(ServiceError::InvalidImport(
            "导入数据必须是每日记录数组".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ImportEntry>(item).map_err(|e| {
                ServiceError::InvalidImport(format!("第 {} 条记录格式错误: {}", index + 1, e))
            })
        })
        .collect()
}

/// 校验导入条目并转换为待写入结构
///
/// 运动记录始终挂到外层每日记录下，其自带的 entry_id 被忽略
pub fn prepare_import(items: &[ImportEntry]) -> Result<Vec<PreparedEntry>> {
    let now = Utc::now();
    let mut dates = HashSet::new();
    let mut entry_ids = HashSet::new();
    let mut exercise_ids = HashSet::new();
    let mut prepared = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        let date = parse_date(&item.date).map_err(|_| {
            ServiceError::InvalidImport(format!("第 {} 条记录日期无效: {}", position, item.date))
        })?;
        if !dates.insert(date) {
            return Err(ServiceError::InvalidImport(format!(
                "日期重复: {}",
                date
            )));
        }
        if let Some(id) = item.id {
            if !entry_ids.insert(id) {
                return Err(ServiceError::InvalidImport(format!(
                    "每日记录 ID 重复: {}",
                    id
                )));
            }
        }

        let created_at = timestamp_or(item.created_at.as_deref(), now);
        let updated_at = timestamp_or(item.updated_at.as_deref(), created_at);

        let mut exercises = Vec::new();
        for exercise in item.exercises.iter().flatten() {
            let exercise_type = exercise.exercise_type.trim();
            if exercise_type.is_empty() {
                return Err(ServiceError::InvalidImport(format!(
                    "{} 的运动类型不能为空",
                    date
                )));
            }
            if let Some(id) = exercise.id {
                if !exercise_ids.insert(id) {
                    return Err(ServiceError::InvalidImport(format!(
                        "运动记录 ID 重复: {}",
                        id
                    )));
                }
            }
            let exercise_date = match exercise.date.as_deref() {
                Some(raw) if !raw.trim().is_empty() => parse_date(raw).map_err(|_| {
                    ServiceError::InvalidImport(format!("运动记录日期无效: {}", raw))
                })?,
                _ => date,
            };
            let ex_created_at = timestamp_or(exercise.created_at.as_deref(), now);

            exercises.push(PreparedExercise {
                id: exercise.id,
                date: exercise_date,
                exercise_type: exercise_type.to_string(),
                details: exercise.details.clone().unwrap_or_default(),
                created_at: ex_created_at,
                updated_at: timestamp_or(exercise.updated_at.as_deref(), ex_created_at),
            });
        }

        prepared.push(PreparedEntry {
            id: item.id,
            date,
            weight: item.weight,
            calories: item.calories,
            created_at,
            updated_at,
            exercises,
        });
    }

    Ok(prepared)
}

fn timestamp_or(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_timestamp).unwrap_or(fallback)
}

/// 事务内清空并写入
///
/// 先写带 ID 的行，再写由数据库分配 ID 的行，避免自增 ID 与后续显式 ID 冲突
async fn replace_all(
    tx: &mut Transaction<'_, Sqlite>,
    entries: &[PreparedEntry],
) -> Result<ImportSummaryDto> {
    sqlx::query("DELETE FROM exercises").execute(&mut **tx).await?;
    sqlx::query("DELETE FROM daily_entries")
        .execute(&mut **tx)
        .await?;

    let mut entry_ids = vec![0_i64; entries.len()];
    let order = explicit_ids_first(entries.iter().map(|e| e.id));
    for index in order {
        let entry = &entries[index];
        let result = sqlx::query(
            r#"
            INSERT INTO daily_entries (id, date, weight, calories, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id)
        .bind(entry.date)
        .bind(entry.weight)
        .bind(entry.calories)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&mut **tx)
        .await?;
        entry_ids[index] = entry.id.unwrap_or_else(|| result.last_insert_rowid());
    }

    let exercises: Vec<(i64, &PreparedExercise)> = entries
        .iter()
        .zip(&entry_ids)
        .flat_map(|(entry, &entry_id)| entry.exercises.iter().map(move |ex| (entry_id, ex)))
        .collect();
    for index in explicit_ids_first(exercises.iter().map(|(_, ex)| ex.id)) {
        let (entry_id, exercise) = exercises[index];
        sqlx::query(
            r#"
            INSERT INTO exercises (id, date, type, details, entry_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(exercise.id)
        .bind(exercise.date)
        .bind(&exercise.exercise_type)
        .bind(&exercise.details)
        .bind(entry_id)
        .bind(exercise.created_at)
        .bind(exercise.updated_at)
        .execute(&mut **tx)
        .await?;
    }

    Ok(ImportSummaryDto {
        entries: entries.len(),
        exercises: exercises.len(),
    })
}

/// 返回写入顺序：带显式 ID 的下标在前，其余保持原顺序
fn explicit_ids_first(ids: impl Iterator<Item = Option<i64>>) -> Vec<usize> {
    let (mut explicit, implicit): (Vec<_>, Vec<_>) =
        ids.enumerate().partition(|(_, id)| id.is_some());
    explicit.extend(implicit);
    explicit.into_iter().map(|(index, _)| index).collect()
}
