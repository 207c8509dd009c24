//! 文件归档服务 - 业务能力层
//!
//! 负责把处理完成的文件移入 `processed/` 子目录

use crate::error::{AppError, AppResult, FileError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 已处理子目录名
pub const PROCESSED_DIR: &str = "processed";

/// 已转换 JSON 的文件名前缀
pub const PROCESSED_PREFIX: &str = "PROCESSED_";

/// 把单个文件移动到目标路径，必要时创建父目录
pub fn move_file(from: &Path, to: &Path) -> AppResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    fs::rename(from, to).map_err(|e| {
        AppError::File(FileError::MoveFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            source: Box::new(e),
        })
    })
}

/// 文件归档服务
///
/// 把 JSON 结果移动到 `<base>/processed/PROCESSED_<时间戳>_<文件名>`
pub struct FileArchiver {
    processed_folder: PathBuf,
}

impl FileArchiver {
    /// 以结果目录为基准创建
    pub fn new(base_folder: impl AsRef<Path>) -> Self {
        Self {
            processed_folder: base_folder.as_ref().join(PROCESSED_DIR),
        }
    }

    /// 归档一批文件
    ///
    /// 单个文件失败只记录日志，不影响其他文件
    ///
    /// # 返回
    /// 成功移动的文件数
    pub fn archive(&self, files: &[PathBuf]) -> usize {
        if files.is_empty() {
            return 0;
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut moved = 0;

        for file in files {
            let Some(name) = file.file_name() else {
                warn!("  跳过无文件名的路径: {}", file.display());
                continue;
            };
            if !file.exists() {
                warn!("  文件已不存在，跳过: {}", file.display());
                continue;
            }

            let destination = self.processed_folder.join(format!(
                "{}{}_{}",
                PROCESSED_PREFIX,
                timestamp,
                name.to_string_lossy()
            ));

            match move_file(file, &destination) {
                Ok(()) => {
                    moved += 1;
                    info!("  已移动 {} 到归档目录", name.to_string_lossy());
                }
                Err(e) => warn!("  移动失败 {}: {}", file.display(), e),
            }
        }

        info!("📁 已归档 {} 个 JSON 文件到 {}", moved, self.processed_folder.display());
        moved
    }
}
