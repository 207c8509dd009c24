//! 海报处理上下文
//!
//! 封装"我正在处理第几张海报"这一信息

use std::fmt::Display;
use std::path::Path;

/// 海报处理上下文
#[derive(Debug, Clone)]
pub struct PlaybillCtx {
    /// 海报文件名
    pub file_name: String,

    /// 当前序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 本轮海报总数
    pub total: usize,
}

impl PlaybillCtx {
    /// 创建新的海报上下文
    pub fn new(path: &Path, index: usize, total: usize) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            index,
            total,
        }
    }
}

impl Display for PlaybillCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[海报 {}/{} {}]", self.index, self.total, self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = PlaybillCtx::new(Path::new("playbills/1980-81-Manon.jpg"), 2, 5);
        assert_eq!(ctx.to_string(), "[海报 2/5 1980-81-Manon.jpg]");
    }
}
