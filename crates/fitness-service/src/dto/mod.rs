//! DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

// 重新导出常用类型
pub use request::{
    CreateDailyEntryRequest, CreateExerciseRequest, DATE_FORMAT, DateRangeParams, ImportEntry,
    ImportExercise, RawDataFormat, RawDataParams, UpdateDailyEntryRequest, UpdateExerciseRequest,
    parse_date, parse_timestamp, required_type,
};

pub use response::{
    ApiResponse, ChartPointDto, DailyEntryDto, DashboardDto, DashboardSummaryDto, DataDumpDto,
    DeletedEntryDto, DeletedResponse, ExercisePointDto, ExerciseDto, ExerciseSeriesDto,
    ExportEntryDto, ImportSummaryDto, RawRecordDto, RawRecordMetadata,
};
