//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use sqlx::SqlitePool;

use crate::repository::{EntryRepository, ExerciseRepository};
use crate::service::{DashboardService, DataTransferService, RawDataService};

/// Axum 应用共享状态
///
/// 连接池内部基于 Arc，clone 开销很小
#[derive(Clone)]
pub struct AppState {
    /// SQLite 连接池
    pub pool: SqlitePool,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn entry_repo(&self) -> EntryRepository {
        EntryRepository::new(self.pool.clone())
    }

    pub fn exercise_repo(&self) -> ExerciseRepository {
        ExerciseRepository::new(self.pool.clone())
    }

    pub fn data_transfer(&self) -> DataTransferService {
        DataTransferService::new(self.pool.clone())
    }

    pub fn raw_data(&self) -> RawDataService {
        RawDataService::new(self.pool.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.pool.clone())
    }
}
