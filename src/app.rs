//! 应用主流程
//!
//! 1. 分析阶段：把待处理海报提交给分析服务并保存结果（未配置时跳过）
//! 2. 转换阶段：读取全部结果 JSON，按年份生成工作簿
//! 3. 归档阶段：转换成功的 JSON 移入 processed 目录

use crate::clients::{AnalysisClient, AnalysisSettings};
use crate::config::Config;
use crate::models::{list_json_files, list_playbill_files};
use crate::orchestrator::{run_batch, BatchOutcome};
use crate::services::{FailureWriter, FileArchiver, ReportWriter, WriteOutcome};
use crate::utils::logging::{
    init_log_file, log_files_loaded, log_phase, log_sample_rows, log_startup, print_final_stats,
};
use crate::workflow::{PlaybillCtx, PlaybillFlow};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

/// 样例输出行数
const SAMPLE_ROWS: usize = 5;

/// 应用主结构
pub struct App {
    config: Config,
    flow: Option<PlaybillFlow>,
    failure_writer: FailureWriter,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    /// 格式正确但没有有效记录的文件，不计入失败
    pub empty: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(config.analysis_enabled());

        let flow = if config.analysis_enabled() {
            let client = AnalysisClient::new(&AnalysisSettings::from_config(&config))
                .context("无法创建分析客户端")?;
            Some(PlaybillFlow::new(client, &config))
        } else {
            None
        };

        Ok(Self {
            failure_writer: FailureWriter::with_path(config.warn_file.clone()),
            config,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let analysis = self.analyze_playbills().await?;
        if analysis.total > 0 {
            info!(
                "✓ 分析阶段完成: 成功 {}/{}，失败 {}",
                analysis.success, analysis.total, analysis.failed
            );
        }

        let stats = self.convert_results()?;

        print_final_stats(&stats, &self.config.output_log_file);

        Ok(stats)
    }

    /// 分析阶段
    async fn analyze_playbills(&self) -> Result<ProcessingStats> {
        let Some(flow) = &self.flow else {
            warn!("⚠️ 未配置分析服务，跳过分析阶段");
            return Ok(ProcessingStats::default());
        };

        log_phase("🖼️ 分析海报...");

        let playbills_path = self.config.playbills_path();
        if !playbills_path.is_dir() {
            warn!("⚠️ 海报目录不存在: {}", playbills_path.display());
            return Ok(ProcessingStats::default());
        }

        let playbills = list_playbill_files(&playbills_path)?;
        log_files_loaded(playbills.len(), "海报");

        let mut stats = ProcessingStats {
            total: playbills.len(),
            ..Default::default()
        };

        for (idx, playbill) in playbills.iter().enumerate() {
            let ctx = PlaybillCtx::new(playbill, idx + 1, playbills.len());
            match flow.run(playbill, &ctx).await {
                Ok(_) => stats.success += 1,
                Err(e) => {
                    error!("{} ❌ 分析失败: {}", ctx, e);
                    self.record_failure(playbill, &e.to_string());
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// 转换阶段 + 归档阶段
    fn convert_results(&self) -> Result<ProcessingStats> {
        log_phase("📊 转换分析结果为按年份分表的工作簿...");

        let results_path = self.config.results_path();
        if !results_path.is_dir() {
            warn!("⚠️ 结果目录不存在: {}", results_path.display());
            return Ok(ProcessingStats::default());
        }

        let json_files = list_json_files(&results_path)?;
        if json_files.is_empty() {
            warn!("⚠️ 在 {} 中没有找到 JSON 文件", results_path.display());
            return Ok(ProcessingStats::default());
        }
        log_files_loaded(json_files.len(), "JSON 文件");

        let outcome = run_batch(&json_files);
        self.record_batch_failures(&outcome);

        let stats = ProcessingStats {
            success: outcome.processed.len(),
            failed: outcome.failures.len(),
            empty: outcome.empty.len(),
            total: json_files.len(),
        };

        if outcome.aggregate.is_empty() {
            warn!("⚠️ 没有从任何文件中抽取到有效数据");
            return Ok(stats);
        }

        let output_path = self.config.output_path();
        let written = ReportWriter::new()
            .write(&outcome.aggregate, &output_path)
            .with_context(|| format!("无法写入工作簿: {}", output_path.display()))?;

        match written {
            WriteOutcome::Written { path, .. } => {
                info!("✅ 工作簿生成完成: {}", path.display());
                if self.config.verbose_logging {
                    log_sample_rows(outcome.aggregate.records(), SAMPLE_ROWS);
                }

                log_phase("📁 归档已处理的 JSON 文件...");
                FileArchiver::new(&results_path).archive(&outcome.processed);
            }
            WriteOutcome::NothingToWrite => {
                warn!("⚠️ 工作簿未生成，保留原始 JSON 文件");
            }
        }

        Ok(stats)
    }

    fn record_batch_failures(&self, outcome: &BatchOutcome) {
        for failure in &outcome.failures {
            self.record_failure(&failure.path, &failure.reason);
        }
    }

    fn record_failure(&self, path: &std::path::Path, reason: &str) {
        if let Err(e) = self.failure_writer.write(path, reason) {
            warn!("写入失败记录出错: {}", e);
        }
    }
}
