//! 原始数据服务
//!
//! 把每日记录与运动记录展开为扁平记录，供数据管理页查看和下载

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::instrument;

use fitness_shared::observability::metrics;

use crate::dto::{DataDumpDto, RawRecordDto, RawRecordMetadata};
use crate::error::{Result, ServiceError};
use crate::models::{DailyEntry, Exercise};
use crate::repository::{DateRange, EntryRepository, ExerciseRepository};

const BASE_COLUMNS: [&str; 5] = ["date", "weight", "calories", "exerciseType", "exerciseDetails"];
const METADATA_COLUMNS: [&str; 6] = [
    "entryId",
    "entryCreatedAt",
    "entryUpdatedAt",
    "exerciseId",
    "exerciseCreatedAt",
    "exerciseUpdatedAt",
];

/// 原始数据服务
pub struct RawDataService {
    pool: SqlitePool,
}

impl RawDataService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 查询区间内的扁平记录，按日期正序
    #[instrument(skip(self))]
    pub async fn records(&self, range: DateRange, include_metadata: bool) -> Result<Vec<RawRecordDto>> {
        let entries = EntryRepository::new(self.pool.clone())
            .list_in_range(range)
            .await?;
        let exercises = ExerciseRepository::new(self.pool.clone())
            .list_by_entry_date(range)
            .await?;

        Ok(flatten_records(entries, exercises, include_metadata))
    }

    /// 导出 CSV 文本
    pub async fn csv(&self, range: DateRange, include_metadata: bool) -> Result<String> {
        let records = self.records(range, include_metadata).await?;
        let body = write_csv(&records, include_metadata)?;
        metrics::record_export("csv");
        Ok(body)
    }

    /// 两张表的全部原始行
    pub async fn dump(&self) -> Result<DataDumpDto> {
        let daily_entries = EntryRepository::new(self.pool.clone()).list_raw().await?;
        let exercises = ExerciseRepository::new(self.pool.clone()).list_raw().await?;

        Ok(DataDumpDto {
            daily_entries: daily_entries.into_iter().map(Into::into).collect(),
            exercises: exercises.into_iter().map(Into::into).collect(),
        })
    }
}

/// 每个 (每日记录, 运动) 组合生成一条记录；没有运动的每日记录生成一条运动列为空的记录
pub fn flatten_records(
    entries: Vec<DailyEntry>,
    exercises: Vec<Exercise>,
    include_metadata: bool,
) -> Vec<RawRecordDto> {
    let mut grouped: HashMap<i64, Vec<Exercise>> = HashMap::new();
    for exercise in exercises {
        grouped.entry(exercise.entry_id).or_default().push(exercise);
    }

    let mut records = Vec::new();
    for entry in entries {
        let day = grouped.remove(&entry.id).unwrap_or_default();
        if day.is_empty() {
            records.push(record(&entry, None, include_metadata));
        } else {
            records.extend(day.iter().map(|ex| record(&entry, Some(ex), include_metadata)));
        }
    }
    records
}

fn record(entry: &DailyEntry, exercise: Option<&Exercise>, include_metadata: bool) -> RawRecordDto {
    RawRecordDto {
        date: entry.date,
        weight: entry.weight,
        calories: entry.calories,
        exercise_type: exercise.map(|ex| ex.exercise_type.clone()),
        exercise_details: exercise.map(|ex| ex.details.clone()),
        metadata: include_metadata.then(|| RawRecordMetadata {
            entry_id: entry.id,
            entry_created_at: entry.created_at,
            entry_updated_at: entry.updated_at,
            exercise_id: exercise.map(|ex| ex.id),
            exercise_created_at: exercise.map(|ex| ex.created_at),
            exercise_updated_at: exercise.map(|ex| ex.updated_at),
        }),
    }
}

/// 生成带表头的 CSV，缺省值写为空字段
pub fn write_csv(records: &[RawRecordDto], include_metadata: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    if include_metadata {
        header.extend(METADATA_COLUMNS);
    }
    writer.write_record(&header)?;

    for r in records {
        let mut row = vec![
            r.date.to_string(),
            opt(r.weight),
            opt(r.calories),
            r.exercise_type.clone().unwrap_or_default(),
            r.exercise_details.clone().unwrap_or_default(),
        ];
        if include_metadata {
            match &r.metadata {
                Some(m) => row.extend([
                    m.entry_id.to_string(),
                    m.entry_created_at.to_rfc3339(),
                    m.entry_updated_at.to_rfc3339(),
                    opt(m.exercise_id),
                    opt(m.exercise_created_at.map(|t| t.to_rfc3339())),
                    opt(m.exercise_updated_at.map(|t| t.to_rfc3339())),
                ]),
                None => row.extend(std::iter::repeat_n(String::new(), METADATA_COLUMNS.len())),
            }
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(format!("CSV 缓冲区写入失败: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Internal(format!("CSV 编码错误: {}", e)))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
