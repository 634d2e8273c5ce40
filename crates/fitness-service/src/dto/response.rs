//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DailyEntry, Exercise};

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 每日记录响应 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntryDto {
    pub id: i64,
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub calories: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyEntry> for DailyEntryDto {
    fn from(entry: DailyEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            weight: entry.weight,
            calories: entry.calories,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// 运动记录响应 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDto {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub details: String,
    pub entry_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exercise> for ExerciseDto {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            date: exercise.date,
            exercise_type: exercise.exercise_type,
            details: exercise.details,
            entry_id: exercise.entry_id,
            created_at: exercise.created_at,
            updated_at: exercise.updated_at,
        }
    }
}

/// 删除每日记录响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedEntryDto {
    pub id: i64,
    /// 级联删除的运动记录数
    pub deleted_exercises: u64,
}

/// 删除响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub id: i64,
}

/// 导出文档中的每日记录（附带当天运动）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntryDto {
    #[serde(flatten)]
    pub entry: DailyEntryDto,
    pub exercises: Vec<ExerciseDto>,
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryDto {
    pub entries: usize,
    pub exercises: usize,
}

/// 全量原始数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDumpDto {
    pub daily_entries: Vec<DailyEntryDto>,
    pub exercises: Vec<ExerciseDto>,
}

/// 扁平化的原始数据记录：每个 (每日记录, 运动) 组合一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecordDto {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub calories: Option<f64>,
    pub exercise_type: Option<String>,
    pub exercise_details: Option<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RawRecordMetadata>,
}

/// 原始数据记录的元数据（includeMetadata=true 时输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecordMetadata {
    pub entry_id: i64,
    pub entry_created_at: DateTime<Utc>,
    pub entry_updated_at: DateTime<Utc>,
    pub exercise_id: Option<i64>,
    pub exercise_created_at: Option<DateTime<Utc>>,
    pub exercise_updated_at: Option<DateTime<Utc>>,
}

/// 图表数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPointDto {
    pub date: NaiveDate,
    pub value: f64,
}

/// 某一天各运动类型的数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePointDto {
    pub date: NaiveDate,
    pub values: BTreeMap<String, i64>,
}

/// 运动趋势序列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSeriesDto {
    /// 出现过数值的运动类型，按字母排序
    pub types: Vec<String>,
    pub points: Vec<ExercisePointDto>,
}

/// 看板汇总指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummaryDto {
    pub entry_count: usize,
    pub latest_weight: Option<f64>,
    /// 最新体重减去最早体重
    pub weight_change: Option<f64>,
    pub average_calories: Option<f64>,
}

/// 看板数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub weight: Vec<ChartPointDto>,
    pub calories: Vec<ChartPointDto>,
    pub exercises: ExerciseSeriesDto,
    pub summary: DashboardSummaryDto,
}
