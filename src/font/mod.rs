//! # 字体与文字 Logo 模块
//!
//! ## 设计思路
//!
//! - `provider`：字体探测链（本地首选 → 下载 → 本地回退 → 内置点阵），永不失败
//! - `face`：矢量字体 / 点阵字体的统一测量与绘制
//! - `bitmap`：内置 5×7 点阵字形表
//! - `render`：居中绘制、合成叠加层、独立 Logo 与图标预设

mod bitmap;
mod face;
mod provider;
mod render;

pub use face::{FontFace, TextBounds};
pub use provider::{
    BuiltinFontProvider, DownloadFontProvider, FontChain, FontProvider, LocalFontProvider,
};
pub use render::{
    ICON_CANVAS, ICON_FONT_PX, ICON_SQUARE, WORDMARK_CANVAS, WORDMARK_FONT_PX, overlay_canvas_size,
    render_brand_icon, render_icon, render_overlay_logo, render_text_logo, render_wordmark,
};

/// 测试用系统矢量字体；机器上没有时相关测试直接跳过。
#[cfg(test)]
pub(crate) fn system_test_font() -> Option<std::path::PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "C:/Windows/Fonts/arialbd.ttf",
    ]
    .iter()
    .map(std::path::PathBuf::from)
    .find(|path| path.is_file())
}
