//! 输出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理合成结果的落盘位置与命名，批处理循环只关心“写到哪”。
//!
//! # 实现思路
//!
//! - 输出目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 输出文件名固定为 `<源图主干名>-<variant>.png`。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// 准备输出目录
///
/// # 返回
/// - `Ok(PathBuf)` — 可写入的输出目录
/// - `Err(AppError::Storage)` — 路径被文件占用或无法创建
pub fn prepare_output_dir(dir: &Path) -> Result<PathBuf, AppError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(AppError::Storage(format!(
                "'{}' 已存在且不是目录",
                dir.display()
            )));
        }
        return Ok(dir.to_path_buf());
    }

    fs::create_dir_all(dir).map_err(|e| {
        AppError::Storage(format!("创建输出目录 '{}' 失败: {}", dir.display(), e))
    })?;
    log::info!("📁 已创建输出目录: {}", dir.display());
    Ok(dir.to_path_buf())
}

/// 为单个输出文件创建父目录。
pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            prepare_output_dir(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `<stem>-<variant>.png`
pub fn output_file_name(image: &str, variant: &str) -> String {
    let stem = Path::new(image)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| image.to_string());

    format!("{}-{}.png", stem, sanitize_component(variant))
}

pub fn output_path(output_dir: &Path, image: &str, variant: &str) -> PathBuf {
    output_dir.join(output_file_name(image, variant))
}

// 变体名不允许跳出输出目录
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
