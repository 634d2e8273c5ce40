//! 看板聚合服务
//!
//! 把每日记录和运动记录整理成图表可直接使用的序列。
//! 运动数值取描述中出现的第一个整数，如 "3 sets of 10" 取 3，"5km" 取 5。

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::instrument;

use crate::dto::{
    ChartPointDto, DashboardDto, DashboardSummaryDto, ExercisePointDto, ExerciseSeriesDto,
};
use crate::error::Result;
use crate::models::{DailyEntry, Exercise};
use crate::repository::{DateRange, EntryRepository, ExerciseRepository};

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("常量正则表达式合法"));

/// 看板聚合服务
pub struct DashboardService {
    pool: SqlitePool,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 查询区间内的数据并聚合
    #[instrument(skip(self))]
    pub async fn dashboard(&self, range: DateRange) -> Result<DashboardDto> {
        let entries = EntryRepository::new(self.pool.clone())
            .list_in_range(range)
            .await?;
        let exercises = ExerciseRepository::new(self.pool.clone())
            .list_by_entry_date(range)
            .await?;

        Ok(build_dashboard(&entries, &exercises))
    }
}

/// 提取描述中的第一个整数，超出 i64 范围视为无数值
pub fn first_integer(details: &str) -> Option<i64> {
    FIRST_INTEGER
        .find(details)
        .and_then(|m| m.as_str().parse().ok())
}

/// 聚合看板数据
///
/// `entries` 需按日期正序；运动按所属每日记录的日期归档
pub fn build_dashboard(entries: &[DailyEntry], exercises: &[Exercise]) -> DashboardDto {
    let weight: Vec<ChartPointDto> = entries
        .iter()
        .filter_map(|e| e.weight.map(|value| ChartPointDto { date: e.date, value }))
        .collect();
    let calories: Vec<ChartPointDto> = entries
        .iter()
        .filter_map(|e| e.calories.map(|value| ChartPointDto { date: e.date, value }))
        .collect();

    let summary = DashboardSummaryDto {
        entry_count: entries.len(),
        latest_weight: weight.last().map(|p| p.value),
        weight_change: match (weight.first(), weight.last()) {
            (Some(first), Some(last)) if weight.len() > 1 => Some(last.value - first.value),
            _ => None,
        },
        average_calories: if calories.is_empty() {
            None
        } else {
            Some(calories.iter().map(|p| p.value).sum::<f64>() / calories.len() as f64)
        },
    };

    DashboardDto {
        exercises: build_exercise_series(entries, exercises),
        weight,
        calories,
        summary,
    }
}

fn build_exercise_series(entries: &[DailyEntry], exercises: &[Exercise]) -> ExerciseSeriesDto {
    let entry_dates: HashMap<i64, NaiveDate> = entries.iter().map(|e| (e.id, e.date)).collect();

    let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    let mut types = BTreeSet::new();

    for exercise in exercises {
        let Some(&date) = entry_dates.get(&exercise.entry_id) else {
            continue;
        };
        let Some(value) = first_integer(&exercise.details) else {
            continue;
        };

        let total = by_date
            .entry(date)
            .or_default()
            .entry(exercise.exercise_type.clone())
            .or_insert(0);
        *total = total.saturating_add(value);
        types.insert(exercise.exercise_type.clone());
    }

    ExerciseSeriesDto {
        types: types.into_iter().collect(),
        points: by_date
            .into_iter()
            .map(|(date, values)| ExercisePointDto { date, values })
            .collect(),
    }
}
