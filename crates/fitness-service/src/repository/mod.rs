//! 数据访问层
//!
//! 每日记录与运动记录的查询和写入

mod entry_repo;
mod exercise_repo;

pub use entry_repo::EntryRepository;
pub use exercise_repo::ExerciseRepository;

use chrono::NaiveDate;

/// 闭区间日期过滤，两端均可缺省
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// 不做过滤
    pub fn all() -> Self {
        Self::default()
    }
}
