//! # 叠加层来源
//!
//! ## 设计思路
//!
//! 将“叠加层从哪里来”和“怎样贴上去”解耦：
//! - `OverlaySource` 表示外部来源语义（现成 Logo 或按文字合成）
//! - `LoadedBase` 表示已校验、已解码的源图

use std::path::PathBuf;

use image::{Rgba, RgbaImage};

/// 叠加层来源。
#[derive(Debug, Clone)]
pub enum OverlaySource {
    /// 已在内存中的透明底 Logo。
    Raster(RgbaImage),
    /// 磁盘上的现成 Logo 文件（PNG 等带透明通道格式）。
    File(PathBuf),
    /// 按文字即时合成。
    Text { text: String, color: Rgba<u8> },
}

/// 加载阶段输出：解码后的源图与来源标识。
pub(crate) struct LoadedBase {
    pub(crate) image: RgbaImage,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: String,
}
