//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数

use anyhow::Result;
use std::fs;
use tracing::info;

use crate::app::ProcessingStats;
use crate::models::FlatRecord;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n海报转换日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(analysis_enabled: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 海报分析与按年份汇总");
    if analysis_enabled {
        info!("🔗 分析服务: 已配置");
    } else {
        info!("🔗 分析服务: 未配置，仅转换已有结果");
    }
    info!("{}", "=".repeat(60));
}

/// 记录阶段标题
pub fn log_phase(title: &str) {
    info!("\n{}", "=".repeat(60));
    info!("{}", title);
    info!("{}", "=".repeat(60));
}

/// 记录文件扫描结果
pub fn log_files_loaded(total: usize, kind: &str) {
    info!("✓ 找到 {} 个待处理的{}", total, kind);
}

/// 打印前几行样例数据
///
/// # 参数
/// - `records`: 记录
/// - `limit`: 最多打印的行数
pub fn log_sample_rows<'a>(records: impl Iterator<Item = &'a FlatRecord>, limit: usize) {
    info!("\n转换数据样例（前 {} 行）:", limit);
    info!("{}", "-".repeat(90));
    info!(
        "{:<20} {:<10} {:<25} {:<20} {}",
        "SHOW", "DATES", "ROLE", "ARTIST", "OTHER"
    );
    info!("{}", "-".repeat(90));

    let mut shown = 0;
    let mut remaining = 0;
    for record in records {
        if shown < limit {
            info!(
                "{:<20} {:<10} {:<25} {:<20} {}",
                truncate_text(&record.show, 20),
                truncate_text(&record.dates, 10),
                truncate_text(&record.role, 25),
                truncate_text(&record.artist, 20),
                record.other
            );
            shown += 1;
        } else {
            remaining += 1;
        }
    }

    if remaining > 0 {
        info!("... 以及另外 {} 行", remaining);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 转换阶段统计
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &ProcessingStats, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("ℹ️ 无有效数据: {}", stats.empty);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
