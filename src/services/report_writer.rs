//! 报表写入服务 - 业务能力层
//!
//! 把聚合结果写成一个 xlsx 工作簿：每个年份一张表，最后附一张 Summary 表

use crate::error::{AppError, AppResult};
use crate::models::{AggregateResult, FlatRecord, SummaryRow};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

/// 年份表的列
pub const RECORD_COLUMNS: [&str; 6] = ["SHOW", "DATES", "ROLE", "ARTIST", "OTHER", "FILENAME"];

/// Summary 表的列
pub const SUMMARY_COLUMNS: [&str; 5] = ["Year", "Shows", "Total_Roles", "Unique_Shows", "Sheet_Name"];

/// Summary 表名称
pub const SUMMARY_SHEET_NAME: &str = "Summary";

/// 一张待写入的年份表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPlan<'a> {
    pub name: String,
    pub records: &'a [FlatRecord],
}

/// 写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 已写入文件；`sheets` 包含 Summary 表
    Written {
        path: PathBuf,
        sheets: usize,
        rows: usize,
    },
    /// 聚合结果为空，没有生成文件
    NothingToWrite,
}

/// 按工作表顺序规划年份表，跳过空桶
pub fn plan_sheets(aggregate: &AggregateResult) -> Vec<SheetPlan<'_>> {
    aggregate
        .non_empty_buckets()
        .map(|(label, records)| SheetPlan {
            name: label.sheet_name(),
            records: records.as_slice(),
        })
        .collect()
}

/// 计算 Summary 表的行，顺序与年份表一致
pub fn summary_rows(aggregate: &AggregateResult) -> Vec<SummaryRow> {
    aggregate
        .non_empty_buckets()
        .map(|(label, records)| SummaryRow::from_bucket(label, records))
        .collect()
}

/// 报表写入服务
///
/// 职责：
/// - 生成年份表和 Summary 表
/// - 聚合为空时不写文件
/// - 写入失败向调用方返回错误
pub struct ReportWriter {
    header_format: Format,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            header_format: Format::new().set_bold(),
        }
    }

    /// 写入工作簿
    ///
    /// # 参数
    /// - `aggregate`: 聚合结果
    /// - `output_path`: 输出文件路径（已存在则覆盖）
    ///
    /// # 返回
    /// 写入统计，或 `NothingToWrite`
    pub fn write(&self, aggregate: &AggregateResult, output_path: &Path) -> AppResult<WriteOutcome> {
        let plans = plan_sheets(aggregate);
        if plans.is_empty() {
            info!("⚠️ 没有可写入的数据，跳过生成工作簿");
            return Ok(WriteOutcome::NothingToWrite);
        }

        let rows = self
            .build_and_save(&plans, &summary_rows(aggregate), output_path)
            .map_err(|e| AppError::report_write_failed(output_path.display().to_string(), e))?;

        info!("✓ 工作簿已保存: {}", output_path.display());
        info!("📊 总行数: {}, 工作表: {} (含 Summary)", rows, plans.len() + 1);

        Ok(WriteOutcome::Written {
            path: output_path.to_path_buf(),
            sheets: plans.len() + 1,
            rows,
        })
    }

    fn build_and_save(
        &self,
        plans: &[SheetPlan<'_>],
        summary: &[SummaryRow],
        output_path: &Path,
    ) -> Result<usize, XlsxError> {
        let mut workbook = Workbook::new();
        let mut total_rows = 0;

        for plan in plans {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(plan.name.as_str())?;
            self.write_header(worksheet, &RECORD_COLUMNS)?;

            for (idx, record) in plan.records.iter().enumerate() {
                let row = (idx + 1) as u32;
                let cells = [
                    &record.show,
                    &record.dates,
                    &record.role,
                    &record.artist,
                    &record.other,
                    &record.source_file,
                ];
                for (col, value) in cells.into_iter().enumerate() {
                    worksheet.write_string(row, col as u16, value.as_str())?;
                }
            }
            worksheet.autofit();

            total_rows += plan.records.len();
            info!("  工作表 '{}': {} 行", plan.name, plan.records.len());
        }

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SUMMARY_SHEET_NAME)?;
        self.write_header(worksheet, &SUMMARY_COLUMNS)?;
        for (idx, summary_row) in summary.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, summary_row.year.as_str())?;
            worksheet.write_string(row, 1, summary_row.shows.as_str())?;
            worksheet.write_number(row, 2, summary_row.total_roles as f64)?;
            worksheet.write_number(row, 3, summary_row.unique_shows as f64)?;
            worksheet.write_string(row, 4, summary_row.sheet_name.as_str())?;
        }
        worksheet.autofit();
        info!("  工作表 '{}': 各年份概览", SUMMARY_SHEET_NAME);

        workbook.save(output_path)?;

        Ok(total_rows)
    }

    fn write_header(&self, worksheet: &mut Worksheet, columns: &[&str]) -> Result<(), XlsxError> {
        for (col, title) in columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &self.header_format)?;
        }
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
