//! HTTP 请求处理器模块
//!
//! 包含所有 REST API 端点的处理器实现

pub mod daily_entry;
pub mod dashboard;
pub mod exercise;
pub mod health;
pub mod raw_data;
