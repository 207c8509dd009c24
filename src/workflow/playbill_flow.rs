//! 海报分析流程 - 流程层
//!
//! 核心职责：定义"一张海报"的完整处理流程
//!
//! 流程顺序：
//! 1. 提交分析任务
//! 2. 轮询直到完成
//! 3. 保存 `<文件名>_result.json`
//! 4. 原始海报移入 `processed/DONE_<文件名>`

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::clients::AnalysisClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::loaders::DONE_PREFIX;
use crate::services::file_archiver::{move_file, PROCESSED_DIR};
use crate::workflow::playbill_ctx::PlaybillCtx;

/// 单张海报的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybillOutcome {
    /// 保存的分析结果
    pub result_path: PathBuf,
    /// 原始海报的新位置
    pub archived_path: PathBuf,
}

/// 分析结果文件名：`<stem>_result.json`
pub fn result_file_name(playbill: &Path) -> String {
    let stem = playbill
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}_result.json", stem)
}

/// 原始海报归档路径：`<parent>/processed/DONE_<name>`
pub fn done_path(playbill: &Path) -> PathBuf {
    let name = playbill
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    playbill
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(PROCESSED_DIR)
        .join(format!("{}{}", DONE_PREFIX, name))
}

/// 海报分析流程
///
/// - 编排单张海报的提交、轮询、保存、归档
/// - 不触碰聚合结果，失败由调用方记录后继续下一张
pub struct PlaybillFlow {
    client: AnalysisClient,
    analyzer_id: String,
    results_folder: PathBuf,
    timeout: Duration,
    interval: Duration,
}

impl PlaybillFlow {
    /// 创建新的海报分析流程
    pub fn new(client: AnalysisClient, config: &Config) -> Self {
        Self {
            client,
            analyzer_id: config.cu_analyzer_id.clone(),
            results_folder: config.results_path(),
            timeout: config.poll_timeout(),
            interval: config.poll_interval(),
        }
    }

    pub async fn run(&self, playbill: &Path, ctx: &PlaybillCtx) -> AppResult<PlaybillOutcome> {
        info!("{} 🔍 提交分析任务...", ctx);

        let location = playbill.to_string_lossy();
        let result = self
            .client
            .analyze(&self.analyzer_id, &location, self.timeout, self.interval)
            .await?;

        let result_path = self.save_result(playbill, &result).await?;
        info!("{} ✓ 结果已保存: {}", ctx, result_path.display());

        let archived_path = done_path(playbill);
        move_file(playbill, &archived_path)?;
        info!("{} 📁 原始文件已移动到 {}", ctx, archived_path.display());

        Ok(PlaybillOutcome {
            result_path,
            archived_path,
        })
    }

    async fn save_result(&self, playbill: &Path, result: &serde_json::Value) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.results_folder)
            .await
            .map_err(|e| AppError::file_write_failed(self.results_folder.display().to_string(), e))?;

        let path = self.results_folder.join(result_file_name(playbill));
        let pretty = serde_json::to_string_pretty(result)?;
        tokio::fs::write(&path, pretty)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        Ok(path)
    }
}
