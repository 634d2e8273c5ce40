//! 健身记录服务
//!
//! 记录每天的体重、热量摄入和运动，提供 REST API 以及看板聚合、原始数据导出、
//! 整库备份与恢复。
//!
//! ## 核心功能
//!
//! - **每日记录**：每个日期一条，记录体重与热量
//! - **运动记录**：挂在每日记录下，删除每日记录时级联删除
//! - **导出/导入**：导出嵌套结构的备份文件，导入时单事务整体替换
//! - **原始数据**：扁平化记录，支持 JSON / CSV 与日期过滤
//! - **看板**：体重、热量和运动数值的图表序列与汇总指标
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `models`: 与数据表对应的实体
//! - `repository`: 数据访问层
//! - `service`: 跨表业务逻辑
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//! - `error`: 错误类型定义
//! - `extract`: 统一错误响应的请求提取器

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

pub use error::{Result, ServiceError};
pub use models::{DailyEntry, Exercise};
pub use state::AppState;
