//! 独立 Logo 资源生成
//!
//! `create-logo` 与 `create-icon` 两个命令各产出一个 PNG，
//! 写出失败属于致命错误（`AppError::Storage`）。

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::AppError;
use crate::font::{self, FontChain};
use crate::storage;

pub const DEFAULT_LOGO_OUTPUT: &str = "public/images/mh5-logo.png";
pub const DEFAULT_ICON_OUTPUT: &str = "public/images/mh5-icon.png";
pub const DEFAULT_ICON_LETTER: &str = "M";

/// 生成 800×800 透明底白色文字 Logo。
pub fn create_logo_asset(fonts: &FontChain, output: &Path, text: &str) -> Result<PathBuf, AppError> {
    let face = fonts.acquire();
    let image = font::render_wordmark(&face, text);
    save_png(&image, output)?;
    log::info!("✨ Logo 已生成: {}", output.display());
    Ok(output.to_path_buf())
}

/// 生成 512×512 图标（白色方块 + 黑色字母）。
pub fn create_icon_asset(
    fonts: &FontChain,
    output: &Path,
    letter: &str,
) -> Result<PathBuf, AppError> {
    let face = fonts.acquire();
    let image = font::render_brand_icon(&face, letter);
    save_png(&image, output)?;
    log::info!("✨ 图标已生成: {}", output.display());
    Ok(output.to_path_buf())
}

fn save_png(image: &RgbaImage, output: &Path) -> Result<(), AppError> {
    storage::ensure_parent_dir(output)?;
    image
        .save_with_format(output, ImageFormat::Png)
        .map_err(|e| AppError::Storage(format!("写入 '{}' 失败: {}", output.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("logo-compositor-assets-test-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn logo_asset_is_written_as_transparent_png() {
        let dir = unique_temp_dir();
        let output = dir.join("brand").join("mh5-logo.png");

        create_logo_asset(&FontChain::builtin_only(), &output, "MH5").expect("create logo");

        let image = image::open(&output).expect("open logo").to_rgba8();
        assert_eq!(image.dimensions(), (font::WORDMARK_CANVAS, font::WORDMARK_CANVAS));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn icon_asset_is_512_square() {
        let dir = unique_temp_dir();
        let output = dir.join("mh5-icon.png");

        create_icon_asset(&FontChain::builtin_only(), &output, DEFAULT_ICON_LETTER)
            .expect("create icon");

        let image = image::open(&output).expect("open icon").to_rgba8();
        assert_eq!(image.dimensions(), (font::ICON_CANVAS, font::ICON_CANVAS));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unwritable_output_is_a_storage_error() {
        let dir = unique_temp_dir();
        let blocker = dir.join("taken");
        fs::write(&blocker, b"x").expect("write blocker");

        let result = create_logo_asset(&FontChain::builtin_only(), &blocker.join("logo.png"), "MH5");

        assert!(matches!(result, Err(AppError::Storage(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
