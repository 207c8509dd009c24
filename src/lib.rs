//! # Playbill Report
//!
//! 把文档分析服务输出的演出海报 JSON 转换为按年份分表的 xlsx 工作簿
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `FlatRecord`、`YearLabel`、`AggregateResult`、`SummaryRow`
//! - `models/loaders` - JSON 文档读取与文件扫描
//!
//! ### ② 业务能力层（Services）
//! - `record_extractor` - 文档 → 扁平记录
//! - `year_classifier` - 日期文本 → 年份标签
//! - `year_aggregator` - 跨文件按年份分桶
//! - `report_writer` - 年份表 + Summary 表
//! - `failure_writer` / `file_archiver` - 失败记录与归档
//!
//! ### ③ 流程层（Workflow）
//! - `PlaybillFlow` - 单张海报：提交 → 轮询 → 保存结果 → 归档
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::batch_processor` - 一批结果 JSON 的顺序转换
//! - `App` - 分析阶段、转换阶段、归档阶段
//!
//! ### 外部协作
//! - `clients::AnalysisClient` - 文档分析 API（提交任务、轮询结果）

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::AnalysisClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AggregateResult, FlatRecord, SummaryRow, YearLabel};
pub use orchestrator::{run_batch, BatchOutcome};
pub use services::{ReportWriter, WriteOutcome};
pub use workflow::{PlaybillCtx, PlaybillFlow};
