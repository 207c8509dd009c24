//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 负责一批结果文件的调度与统计，是转换流程的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! app (分析阶段 / 转换阶段 / 归档阶段)
//!     ↓
//! orchestrator::batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! services (能力层：extract / classify / aggregate / report)
//!     ↓
//! models (数据结构与文件读取)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单文件隔离**：单个文件失败不影响整批
//! 2. **向下依赖**：编排层 → services → models
//! 3. **无业务逻辑**：只做调度和统计，不做具体抽取判断

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{run_batch, BatchOutcome, FileFailure};
