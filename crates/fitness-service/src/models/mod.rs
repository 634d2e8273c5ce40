//! 实体模型
//!
//! 与数据库表一一对应的行结构

mod daily_entry;
mod exercise;

pub use daily_entry::DailyEntry;
pub use exercise::Exercise;
