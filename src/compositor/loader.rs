//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 源图与现成 Logo 都来自本地文件，在“尽可能早”的阶段执行输入校验，
//! 尽快失败，减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! 1. 存在性 + metadata 体积限制
//! 2. 读取字节后按 magic bytes 校验确实是图片
//! 3. 只读 header 获取尺寸，按像素上限快速拒绝
//! 4. 完整解码并转换为 RGBA

use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, RgbaImage};

use super::source::LoadedBase;
use super::{CompositorConfig, CompositorError, LogoCompositor};

impl LogoCompositor {
    /// 读取并解码源图。
    pub(super) fn load_base_image(&self, path: &Path) -> Result<LoadedBase, CompositorError> {
        log::debug!("📁 开始读取源图 - 路径: {}", path.display());

        let image = Self::load_rgba_from_file(path, &self.config)?;
        Ok(LoadedBase {
            image,
            source_hint: path.display().to_string(),
        })
    }

    /// 读取现成 Logo 文件（保留透明通道）。
    pub fn load_overlay_file(
        path: &Path,
        config: &CompositorConfig,
    ) -> Result<RgbaImage, CompositorError> {
        log::info!("🖼️ 读取现成 Logo - 路径: {}", path.display());
        Self::load_rgba_from_file(path, config)
    }

    fn load_rgba_from_file(
        path: &Path,
        config: &CompositorConfig,
    ) -> Result<RgbaImage, CompositorError> {
        if !path.exists() {
            return Err(CompositorError::FileSystem(format!(
                "文件不存在：{}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| CompositorError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(CompositorError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| CompositorError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        let (width, height) = Self::inspect_dimensions_from_memory(&bytes)?;
        Self::validate_pixel_limits(config, width, height)?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| CompositorError::Decode(format!("图片解码失败：{}", e)))?;

        Ok(decoded.to_rgba8())
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), CompositorError> {
        if bytes.is_empty() {
            return Err(CompositorError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| CompositorError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(CompositorError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 仅通过图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), CompositorError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CompositorError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| CompositorError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(
        config: &CompositorConfig,
        width: u32,
        height: u32,
    ) -> Result<(), CompositorError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| CompositorError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(CompositorError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontChain;
    use image::{ImageFormat, Rgba};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("logo-compositor-loader-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn missing_file_is_reported_as_filesystem_error() {
        let compositor = LogoCompositor::new(CompositorConfig::default(), FontChain::builtin_only());
        let result = compositor.load_base_image(Path::new("/definitely/not/here.jpg"));

        assert!(matches!(result, Err(CompositorError::FileSystem(_))));
    }

    #[test]
    fn non_image_payload_is_rejected_by_signature() {
        let dir = unique_temp_dir();
        let path = dir.join("fake.png");
        std::fs::write(&path, b"<html><body>not an image</body></html>").expect("write fake");

        let result = LogoCompositor::load_overlay_file(&path, &CompositorConfig::default());

        assert!(matches!(result, Err(CompositorError::InvalidFormat(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn oversized_image_is_rejected_before_decode() {
        let dir = unique_temp_dir();
        let path = dir.join("big.png");
        RgbaImage::from_pixel(200, 200, Rgba([1, 2, 3, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");

        let config = CompositorConfig {
            max_decoded_pixels: 1_000,
            ..CompositorConfig::default()
        };
        let result = LogoCompositor::load_overlay_file(&path, &config);

        assert!(matches!(result, Err(CompositorError::ResourceLimit(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn overlay_file_keeps_alpha_channel() {
        let dir = unique_temp_dir();
        let path = dir.join("logo.png");
        RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 0]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");

        let logo = LogoCompositor::load_overlay_file(&path, &CompositorConfig::default())
            .expect("load overlay");

        assert_eq!(logo.dimensions(), (8, 4));
        assert_eq!(logo.get_pixel(3, 2)[3], 0);
        let _ = std::fs::remove_dir_all(dir);
    }
}
