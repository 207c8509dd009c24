use crate::error::{AppError, AppResult, FileError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// 已处理文件的前缀（分析完成的原始海报）
pub const DONE_PREFIX: &str = "DONE_";

/// 读取并解析单个 JSON 文档
pub fn load_json_document(json_file_path: &Path) -> AppResult<Value> {
    let display = json_file_path.display().to_string();

    let content = fs::read_to_string(json_file_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound {
                path: display.clone(),
            })
        } else {
            AppError::file_read_failed(display.clone(), e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(display, e))
}

/// 列出文件夹中（不递归）的所有 `.json` 文件，按路径排序
pub fn list_json_files(folder_path: &Path) -> AppResult<Vec<PathBuf>> {
    list_files(folder_path, |path| {
        path.extension().and_then(|s| s.to_str()) == Some("json")
    })
}

/// 列出文件夹中待分析的海报文件（跳过 `DONE_` 前缀），按路径排序
pub fn list_playbill_files(folder_path: &Path) -> AppResult<Vec<PathBuf>> {
    list_files(folder_path, |path| {
        path.file_name()
            .and_then(|s| s.to_str())
            .map(|name| !name.starts_with(DONE_PREFIX))
            .unwrap_or(false)
    })
}

fn list_files(folder_path: &Path, keep: impl Fn(&Path) -> bool) -> AppResult<Vec<PathBuf>> {
    if !folder_path.is_dir() {
        return Err(AppError::File(FileError::DirectoryNotFound {
            path: folder_path.display().to_string(),
        }));
    }

    let entries = fs::read_dir(folder_path)
        .map_err(|e| AppError::file_read_failed(folder_path.display().to_string(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && keep(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}
