//! 服务层
//!
//! 跨表的业务逻辑：导出/导入、原始数据展开、看板聚合。
//! 单表 CRUD 由 handler 直接调用仓储层完成。

pub mod dashboard;
pub mod data_transfer;
pub mod raw_data;

pub use dashboard::DashboardService;
pub use data_transfer::DataTransferService;
pub use raw_data::RawDataService;
