//! # 坐标换算模块
//!
//! ## 设计思路
//!
//! 设计规格中的坐标是相对源图尺寸的百分比，这里把它们换算成绝对像素：
//!
//! ```text
//! left_px  = round(W * left%   / 100)
//! top_px   = round(H * top%    / 100)
//! width_px = round(W * width%  / 100)   （至少 1）
//! height_px= round(H * height% / 100)   （至少 1）
//! ```
//!
//! ## 越界策略
//!
//! - 非数字、NaN、无穷大：拒绝，返回 `InvalidCoordinate`。
//! - 有限但超出 `[0, 100]`：夹到区间内并记录警告。
//! - 尺寸换算结果为 0：提升为 1 像素，避免退化缩放。
//! - 叠加层超出源图右/下边界的部分在合成阶段裁掉。

use crate::design_spec::{Coordinates, PercentValue};

use super::CompositorError;
use super::config::DefaultCoordinates;

/// 叠加层在源图上的绝对像素位置与尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPlacement {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// 已解析、已夹取的四个百分比。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// 解析单个百分比：去掉末尾 `%` 后按浮点数解析。
pub fn parse_percentage(value: &PercentValue) -> Result<f64, CompositorError> {
    let parsed = match value {
        PercentValue::Number(number) => *number,
        PercentValue::Other(other) => {
            return Err(CompositorError::InvalidCoordinate(format!(
                "百分比必须是字符串或数字：{}",
                other
            )));
        }
        PercentValue::Text(text) => {
            let trimmed = text.trim();
            let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
            numeric.parse::<f64>().map_err(|e| {
                CompositorError::InvalidCoordinate(format!("无法解析百分比 '{}'：{}", text, e))
            })?
        }
    };

    if !parsed.is_finite() {
        return Err(CompositorError::InvalidCoordinate(format!(
            "百分比必须是有限数值：{}",
            parsed
        )));
    }

    Ok(parsed)
}

fn resolve_field(
    name: &str,
    value: Option<&PercentValue>,
    default: &str,
) -> Result<f64, CompositorError> {
    let parsed = match value {
        Some(value) => parse_percentage(value)?,
        None => parse_percentage(&PercentValue::from(default))?,
    };

    let clamped = parsed.clamp(0.0, 100.0);
    if clamped != parsed {
        log::warn!("⚠️ 坐标 {} 超出 0~100%：{}，已夹取为 {}", name, parsed, clamped);
    }
    Ok(clamped)
}

/// 按字段填充默认值并解析全部坐标。
pub fn resolve_percentages(
    coordinates: &Coordinates,
    defaults: &DefaultCoordinates,
) -> Result<PercentRect, CompositorError> {
    Ok(PercentRect {
        top: resolve_field("top", coordinates.top.as_ref(), &defaults.top)?,
        left: resolve_field("left", coordinates.left.as_ref(), &defaults.left)?,
        width: resolve_field("width", coordinates.width.as_ref(), &defaults.width)?,
        height: resolve_field("height", coordinates.height.as_ref(), &defaults.height)?,
    })
}

/// `round(dimension * percent / 100)`。
pub fn percent_to_pixels(dimension: u32, percent: f64) -> u32 {
    (dimension as f64 * percent / 100.0).round().max(0.0) as u32
}

impl PixelPlacement {
    /// 把百分比矩形换算到给定尺寸的源图上。
    pub fn from_percentages(rect: PercentRect, base_width: u32, base_height: u32) -> Self {
        Self {
            left: percent_to_pixels(base_width, rect.left),
            top: percent_to_pixels(base_height, rect.top),
            width: percent_to_pixels(base_width, rect.width).max(1),
            height: percent_to_pixels(base_height, rect.height).max(1),
        }
    }

    pub fn from_coordinates(
        coordinates: &Coordinates,
        defaults: &DefaultCoordinates,
        base_width: u32,
        base_height: u32,
    ) -> Result<Self, CompositorError> {
        let rect = resolve_percentages(coordinates, defaults)?;
        Ok(Self::from_percentages(rect, base_width, base_height))
    }
}
