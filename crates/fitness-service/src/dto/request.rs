//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::error::{Result, ServiceError};
use crate::repository::DateRange;

/// 日期格式：YYYY-MM-DD
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析 YYYY-MM-DD 日期
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("日期不能为空".to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ServiceError::Validation(format!("日期格式无效，应为 YYYY-MM-DD: {}", raw)))
}

/// 解析时间戳
///
/// 接受 RFC 3339（本服务导出格式），以及 SQLite CURRENT_TIMESTAMP 的
/// `YYYY-MM-DD HH:MM:SS` 格式（按 UTC 解释）
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 创建每日记录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyEntryRequest {
    pub date: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 1000.0, message = "体重必须在 0-1000 之间"))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 100000.0, message = "热量必须在 0-100000 之间"))]
    pub calories: Option<f64>,
}

impl CreateDailyEntryRequest {
    /// 校验并返回记录日期
    pub fn parsed_date(&self) -> Result<NaiveDate> {
        match self.date.as_deref() {
            Some(raw) => parse_date(raw),
            None => Err(ServiceError::Validation("日期不能为空".to_string())),
        }
    }
}

/// 更新每日记录请求
///
/// 整体替换：未提供的字段会被清空
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDailyEntryRequest {
    #[validate(range(exclusive_min = 0.0, max = 1000.0, message = "体重必须在 0-1000 之间"))]
    pub weight: Option<f64>,
    #[validate(range(min = 0.0, max = 100000.0, message = "热量必须在 0-100000 之间"))]
    pub calories: Option<f64>,
}

/// 创建运动记录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    /// 缺省时取所属每日记录的日期
    pub date: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "运动类型不能超过 100 个字符"))]
    pub exercise_type: Option<String>,
    #[validate(length(max = 1000, message = "运动描述不能超过 1000 个字符"))]
    pub details: Option<String>,
    #[serde(alias = "entry_id")]
    pub entry_id: Option<i64>,
}

/// 更新运动记录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "运动类型不能超过 100 个字符"))]
    pub exercise_type: Option<String>,
    #[validate(length(max = 1000, message = "运动描述不能超过 1000 个字符"))]
    pub details: Option<String>,
}

/// 取出去除首尾空白后的非空运动类型
pub fn required_type(exercise_type: Option<&str>) -> Result<String> {
    match exercise_type.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(ServiceError::Validation("运动类型不能为空".to_string())),
    }
}

/// 日期区间查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeParams {
    /// 解析为闭区间，起始晚于结束时报错
    pub fn range(&self) -> Result<DateRange> {
        let start = self.start_date.as_deref().map(parse_date).transpose()?;
        let end = self.end_date.as_deref().map(parse_date).transpose()?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ServiceError::Validation(format!(
                    "起始日期 {} 晚于结束日期 {}",
                    s, e
                )));
            }
        }
        Ok(DateRange::new(start, end))
    }
}

/// 原始数据输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDataFormat {
    Json,
    Csv,
}

/// 原始数据查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataParams {
    pub format: Option<String>,
    pub include_metadata: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RawDataParams {
    pub fn range(&self) -> Result<DateRange> {
        DateRangeParams {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
        .range()
    }

    pub fn format(&self) -> Result<RawDataFormat> {
        match self.format.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("json") => Ok(RawDataFormat::Json),
            Some("csv") => Ok(RawDataFormat::Csv),
            Some(other) => Err(ServiceError::Validation(format!(
                "不支持的格式: {}，可选 json 或 csv",
                other
            ))),
        }
    }

    pub fn include_metadata(&self) -> bool {
        self.include_metadata.unwrap_or(false)
    }
}

/// 导入数据中的每日记录
///
/// 同时兼容驼峰格式（本服务导出）和旧版下划线格式的备份文件
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub id: Option<i64>,
    pub date: String,
    pub weight: Option<f64>,
    pub calories: Option<f64>,
    #[serde(alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(alias = "updated_at")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub exercises: Option<Vec<ImportExercise>>,
}

/// 导入数据中的运动记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportExercise {
    pub id: Option<i64>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub exercise_type: String,
    #[serde(default)]
    pub details: Option<String>,
    /// 仅用于兼容旧格式；导入时始终挂到外层每日记录下
    #[serde(alias = "entry_id")]
    pub entry_id: Option<i64>,
    #[serde(alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(alias = "updated_at")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-01-05 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert!(parse_date("").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("01/05/2024").is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T08:30:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-03-01T06:30:00+00:00");

        let sqlite = parse_timestamp("2024-03-01 08:30:00").unwrap();
        assert_eq!(sqlite.to_rfc3339(), "2024-03-01T08:30:00+00:00");

        let js = parse_timestamp("2024-03-01T08:30:00.123Z").unwrap();
        assert_eq!(js.timestamp_subsec_millis(), 123);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_create_entry_validation() {
        let valid = CreateDailyEntryRequest {
            date: Some("2024-01-01".into()),
            weight: Some(72.5),
            calories: Some(0.0),
        };
        assert!(valid.validate().is_ok());
        assert!(valid.parsed_date().is_ok());

        let zero_weight = CreateDailyEntryRequest {
            date: Some("2024-01-01".into()),
            weight: Some(0.0),
            calories: None,
        };
        assert!(zero_weight.validate().is_err());

        let negative_calories = CreateDailyEntryRequest {
            date: Some("2024-01-01".into()),
            weight: None,
            calories: Some(-5.0),
        };
        assert!(negative_calories.validate().is_err());

        let missing_date = CreateDailyEntryRequest {
            date: None,
            weight: None,
            calories: None,
        };
        assert!(missing_date.parsed_date().is_err());
    }

    #[test]
    fn test_required_type() {
        assert_eq!(required_type(Some("  Running ")).unwrap(), "Running");
        assert!(required_type(Some("   ")).is_err());
        assert!(required_type(None).is_err());
    }

    #[test]
    fn test_create_exercise_accepts_snake_case_entry_id() {
        let req: CreateExerciseRequest =
            serde_json::from_str(r#"{"type":"Yoga","entry_id":4,"details":"30 min"}"#).unwrap();
        assert_eq!(req.entry_id, Some(4));
        assert_eq!(req.exercise_type.as_deref(), Some("Yoga"));

        let req: CreateExerciseRequest =
            serde_json::from_str(r#"{"type":"Yoga","entryId":5}"#).unwrap();
        assert_eq!(req.entry_id, Some(5));
    }

    #[test]
    fn test_date_range_params() {
        let params = DateRangeParams {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
        };
        let range = params.range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 31));

        let inverted = DateRangeParams {
            start_date: Some("2024-02-01".into()),
            end_date: Some("2024-01-01".into()),
        };
        assert!(inverted.range().is_err());

        assert_eq!(DateRangeParams::default().range().unwrap(), DateRange::all());
    }

    #[test]
    fn test_raw_data_format() {
        let mut params = RawDataParams::default();
        assert_eq!(params.format().unwrap(), RawDataFormat::Json);
        params.format = Some("CSV".into());
        assert_eq!(params.format().unwrap(), RawDataFormat::Csv);
        params.format = Some("xml".into());
        assert!(params.format().is_err());
        assert!(!params.include_metadata());
    }

    #[test]
    fn test_import_entry_accepts_legacy_backup() {
        let legacy = r#"{
            "id": 1,
            "date": "2024-01-01",
            "weight": 80.1,
            "calories": null,
            "created_at": "2024-01-01 10:00:00",
            "updated_at": "2024-01-01 10:00:00",
            "exercises": [
                {"id": 9, "date": "2024-01-01", "type": "Running", "details": "5km", "entry_id": 1,
                 "created_at": "2024-01-01 10:00:00", "updated_at": "2024-01-01 10:00:00"}
            ]
        }"#;
        let entry: ImportEntry = serde_json::from_str(legacy).unwrap();
        assert_eq!(entry.created_at.as_deref(), Some("2024-01-01 10:00:00"));
        let exercises = entry.exercises.unwrap();
        assert_eq!(exercises[0].entry_id, Some(1));
        assert_eq!(exercises[0].exercise_type, "Running");

        let minimal: ImportEntry = serde_json::from_str(r#"{"date":"2024-01-02"}"#).unwrap();
        assert!(minimal.exercises.is_none());
        assert!(minimal.id.is_none());
    }
}
