//! 批量转换处理器 - 编排层
//!
//! ## 职责
//!
//! 对一批分析结果 JSON 依次执行 读取 → 抽取 → 聚合，汇总成功与失败。
//!
//! ## 设计特点
//!
//! - **逐个文件隔离**：单个文件读取/解析失败只记录，不中断整批
//! - **顺序处理**：聚合状态只属于本次调用，处理完即交给调用方
//! - **不做后续动作**：写报表、归档文件由调用方决定

use crate::models::{load_json_document, AggregateResult};
use crate::services::record_extractor::extract_records;
use crate::services::year_aggregator::YearAggregator;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// 单个文件的失败信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// 一次批处理的结果
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub aggregate: AggregateResult,
    /// 至少产出一条记录的文件（完整路径）
    pub processed: Vec<PathBuf>,
    /// 读取/解析失败的文件
    pub failures: Vec<FileFailure>,
    /// 格式正确但没有有效记录的文件
    pub empty: Vec<PathBuf>,
}

/// 依次处理一批 JSON 文件
///
/// # 参数
/// - `file_paths`: 待处理的文件
///
/// # 返回
/// 聚合结果、成功列表和失败列表；从不因单个文件而中止
pub fn run_batch(file_paths: &[PathBuf]) -> BatchOutcome {
    let mut aggregator = YearAggregator::new();
    let mut outcome = BatchOutcome::default();

    for path in file_paths {
        info!("正在处理: {}", path.display());

        let document = match load_json_document(path) {
            Ok(document) => document,
            Err(e) => {
                error!("  ❌ 处理失败 {}: {}", path.display(), e);
                outcome.failures.push(FileFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let records = extract_records(&document, &file_name_of(path));
        if records.is_empty() {
            info!("  ℹ️ 没有找到有效数据: {}", path.display());
            outcome.empty.push(path.clone());
            continue;
        }

        let extracted = records.len();
        aggregator.add_document(records);
        info!("  ✓ 抽取 {} 行，累计 {} 行", extracted, aggregator.total_records());
        outcome.processed.push(path.clone());
    }

    outcome.aggregate = aggregator.result();
    info!(
        "共从 {} 个文件中抽取 {} 行",
        outcome.processed.len(),
        outcome.aggregate.total_records()
    );

    outcome
}

/// FILENAME 列使用的文件名（不含目录）
fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
