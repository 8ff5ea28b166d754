//! # 配置模块
//!
//! ## 设计思路
//!
//! 将合成链路的所有“可调策略”集中到 `CompositorConfig`，由调用方显式传入，
//! 而不是散落在模块级常量中。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置：默认坐标 0%/0%/15%/5%、霓虹青色 Logo、Lanczos3 滤镜。
//! - 默认坐标以百分比字符串保存，与设计规格 JSON 的格式保持一致。
//! - `validate` 在运行开始时拒绝明显不合理的配置。

use image::Rgba;
use image::imageops::FilterType;

use super::CompositorError;

/// 霓虹青 `#7DF9FF`。
pub const NEON_CYAN: Rgba<u8> = Rgba([125, 249, 255, 255]);

/// 默认 Logo 文案。
pub const DEFAULT_LOGO_TEXT: &str = "MH5";

/// 坐标字段缺省时使用的百分比。
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultCoordinates {
    pub top: String,
    pub left: String,
    pub width: String,
    pub height: String,
}

impl Default for DefaultCoordinates {
    fn default() -> Self {
        Self {
            top: "0".to_string(),
            left: "0".to_string(),
            width: "15".to_string(),
            height: "5".to_string(),
        }
    }
}

/// 合成配置。
///
/// 字段覆盖了源图加载、坐标换算、叠加层缩放三个阶段。
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// 读取源图时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 坐标字段缺省值。
    pub default_coordinates: DefaultCoordinates,
    /// 文字 Logo 的填充颜色。
    pub logo_color: Rgba<u8>,
    /// 文字 Logo 的内容。
    pub logo_text: String,
    /// 叠加层缩放滤镜（禁止 Nearest，避免文字边缘锯齿）。
    pub resize_filter: FilterType,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            default_coordinates: DefaultCoordinates::default(),
            logo_color: NEON_CYAN,
            logo_text: DEFAULT_LOGO_TEXT.to_string(),
            resize_filter: FilterType::Lanczos3,
        }
    }
}

impl CompositorConfig {
    /// 校验配置是否可用于一次完整运行。
    pub fn validate(&self) -> Result<(), CompositorError> {
        if self.resize_filter == FilterType::Nearest {
            return Err(CompositorError::InvalidFormat(
                "叠加层缩放不能使用 Nearest 滤镜".to_string(),
            ));
        }
        if self.logo_text.trim().is_empty() {
            return Err(CompositorError::InvalidFormat("Logo 文案不能为空".to_string()));
        }
        if self.max_decoded_pixels == 0 || self.max_file_size == 0 {
            return Err(CompositorError::ResourceLimit("资源上限必须大于 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_uses_lanczos() {
        let config = CompositorConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.resize_filter, FilterType::Lanczos3);
        assert_eq!(config.default_coordinates.width, "15");
        assert_eq!(config.default_coordinates.height, "5");
    }

    #[test]
    fn nearest_filter_is_rejected() {
        let config = CompositorConfig {
            resize_filter: FilterType::Nearest,
            ..CompositorConfig::default()
        };

        assert!(matches!(config.validate(), Err(CompositorError::InvalidFormat(_))));
    }
}
