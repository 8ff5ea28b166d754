//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `LogoCompositor` 只负责流程编排，不关心批处理循环与命令行。
//! 处理链路固定为：
//! 1. 百分比坐标 → 像素位置与尺寸
//! 2. 准备不低于目标分辨率的叠加层（现成 Logo 或文字合成）
//! 3. Lanczos3 缩到精确尺寸
//! 4. 以叠加层 alpha 为蒙版插值合成
//! 5. 压平为 RGB
//!
//! ## 实现思路
//!
//! - 字体只在第一次需要文字 Logo 时才探测（`OnceCell`），使用现成 Logo 时不触发下载。
//! - 记录 `load/compose/save` 阶段耗时，便于排查大图耗时。

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use image::{ImageFormat, RgbImage, RgbaImage};
use once_cell::unsync::OnceCell;

use crate::design_spec::Coordinates;
use crate::font::{self, FontChain, FontFace};

use super::pipeline::{composite_over, flatten, resize_overlay};
use super::{CompositorConfig, CompositorError, OverlaySource, PixelPlacement};

/// Logo 合成器。
pub struct LogoCompositor {
    pub(super) config: CompositorConfig,
    fonts: FontChain,
    font: OnceCell<FontFace>,
}

impl LogoCompositor {
    /// # 示例
    /// ```rust,ignore
    /// use logo_compositor::compositor::{CompositorConfig, LogoCompositor};
    /// use logo_compositor::font::FontChain;
    ///
    /// let compositor = LogoCompositor::new(CompositorConfig::default(), FontChain::builtin_only());
    /// ```
    pub fn new(config: CompositorConfig, fonts: FontChain) -> Self {
        Self {
            config,
            fonts,
            font: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// 默认的文字叠加层来源（配置中的文案与颜色）。
    pub fn default_text_overlay(&self) -> OverlaySource {
        OverlaySource::Text {
            text: self.config.logo_text.clone(),
            color: self.config.logo_color,
        }
    }

    fn font(&self) -> &FontFace {
        self.font.get_or_init(|| self.fonts.acquire())
    }

    /// 把 Logo 贴到源图上并压平。
    ///
    /// 源图缓冲区在内部被原地修改，所有权随返回值转移给调用方。
    pub fn place_logo(
        &self,
        mut base: RgbaImage,
        coordinates: &Coordinates,
        overlay: &OverlaySource,
    ) -> Result<(RgbImage, PixelPlacement), CompositorError> {
        let (base_width, base_height) = base.dimensions();
        let placement = PixelPlacement::from_coordinates(
            coordinates,
            &self.config.default_coordinates,
            base_width,
            base_height,
        )?;

        let prepared = self.prepare_overlay(overlay, &placement)?;
        let resized = resize_overlay(
            &prepared,
            placement.width,
            placement.height,
            self.config.resize_filter,
        );

        composite_over(&mut base, &resized, placement.left, placement.top);

        log::debug!(
            "🧩 Logo 已合成 - 源图 {}x{} 位置 ({}, {}) 尺寸 {}x{}",
            base_width,
            base_height,
            placement.left,
            placement.top,
            placement.width,
            placement.height
        );

        Ok((flatten(base), placement))
    }

    /// 得到不低于目标分辨率的叠加层。
    fn prepare_overlay<'a>(
        &self,
        overlay: &'a OverlaySource,
        placement: &PixelPlacement,
    ) -> Result<Cow<'a, RgbaImage>, CompositorError> {
        match overlay {
            OverlaySource::Raster(image) => Ok(Cow::Borrowed(image)),
            OverlaySource::File(path) => {
                Ok(Cow::Owned(Self::load_overlay_file(path, &self.config)?))
            }
            OverlaySource::Text { text, color } => {
                self.check_text_canvas(placement)?;
                Ok(Cow::Owned(font::render_overlay_logo(
                    self.font(),
                    text,
                    *color,
                    placement.width,
                    placement.height,
                )))
            }
        }
    }

    /// 文字画布按目标尺寸放大，分配前先按像素上限拒绝。
    fn check_text_canvas(&self, placement: &PixelPlacement) -> Result<(), CompositorError> {
        let (width, height) = font::overlay_canvas_size(placement.width, placement.height);
        let pixels = width as u64 * height as u64;
        if pixels > self.config.max_decoded_pixels {
            return Err(CompositorError::ResourceLimit(format!(
                "文字 Logo 画布过大：{}x{}（限制：{} 像素）",
                width, height, self.config.max_decoded_pixels
            )));
        }
        Ok(())
    }

    /// 处理单个 (image, variant)：加载源图、合成、写出 PNG。
    pub fn apply_to_file(
        &self,
        image_path: &Path,
        coordinates: &Coordinates,
        overlay: &OverlaySource,
        output_path: &Path,
    ) -> Result<PixelPlacement, CompositorError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let loaded = self.load_base_image(image_path)?;
        let load_elapsed = load_start.elapsed();

        let compose_start = Instant::now();
        let (flattened, placement) = self.place_logo(loaded.image, coordinates, overlay)?;
        let compose_elapsed = compose_start.elapsed();

        let save_start = Instant::now();
        flattened
            .save_with_format(output_path, ImageFormat::Png)
            .map_err(|e| CompositorError::Encode(format!("保存图片失败：{}", e)))?;
        let save_elapsed = save_start.elapsed();

        log::debug!(
            "✅ {} 处理完成 - load={}ms compose={}ms save={}ms total={}ms",
            loaded.source_hint,
            load_elapsed.as_millis(),
            compose_elapsed.as_millis(),
            save_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(placement)
    }
}
