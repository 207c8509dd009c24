//! 年份聚合服务 - 业务能力层
//!
//! 在一次批处理中累积所有文档的记录，按年份分桶

use crate::models::{AggregateResult, FlatRecord};
use crate::services::year_classifier::classify_year;
use tracing::debug;

/// 年份聚合器
///
/// 职责：
/// - 逐条识别年份并追加到对应的桶
/// - 记录产出过数据的来源文件
/// - 不去重，同一文件重复出现的行原样保留
///
/// 只在一次批处理内存活，`result()` 消费自身。
#[derive(Debug, Default)]
pub struct YearAggregator {
    aggregate: AggregateResult,
}

impl YearAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一个文档的记录
    ///
    /// 记录非空时，其来源文件被计入 `processed_files`
    pub fn add_document(&mut self, records: Vec<FlatRecord>) {
        let Some(first) = records.first() else {
            return;
        };
        self.aggregate
            .processed_files
            .push(first.source_file.clone());

        for record in records {
            let label = classify_year(&record.dates);
            debug!("{} → {}", record.dates, label);
            self.aggregate.buckets.entry(label).or_default().push(record);
        }
    }

    /// 当前已累积的记录数
    pub fn total_records(&self) -> usize {
        self.aggregate.total_records()
    }

    /// 结束聚合，取出结果
    pub fn result(self) -> AggregateResult {
        self.aggregate
    }
}
