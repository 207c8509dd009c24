//! 失败记录服务 - 业务能力层
//!
//! 只负责"把处理失败的文件写入 warn 文件"，不关心流程

use crate::error::{AppError, AppResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// 失败记录服务
///
/// 职责：
/// - 以追加方式记录无法转换的文件及原因
/// - 一次只处理一个文件
pub struct FailureWriter {
    warn_file_path: String,
}

impl FailureWriter {
    /// 创建新的失败记录服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一条失败记录
    ///
    /// # 参数
    /// - `file`: 失败的文件
    /// - `reason`: 失败原因
    pub fn write(&self, file: &Path, reason: &str) -> AppResult<()> {
        debug!("写入失败记录: {} | {}", file.display(), reason);

        let mut warn_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .map_err(|e| AppError::file_write_failed(self.warn_file_path.as_str(), e))?;

        let line = format!(
            "[{}] 文件 {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            file.display(),
            reason
        );

        warn_file
            .write_all(line.as_bytes())
            .map_err(|e| AppError::file_write_failed(self.warn_file_path.as_str(), e))?;

        Ok(())
    }
}

impl Default for FailureWriter {
    fn default() -> Self {
        Self::new()
    }
}
