//! # 文字 Logo 渲染
//!
//! ## 设计思路
//!
//! 所有文字 Logo 都画在透明画布上，按墨迹包围盒居中：
//!
//! ```text
//! x = (W - 墨迹宽) / 2 - bbox.min_x
//! y = (H - 墨迹高) / 2 - bbox.min_y
//! ```
//!
//! 合成时的叠加层按目标尺寸放大绘制（边长 S = max(w, 2h)，画布 S × S/2，字号 S/3），
//! 再交给 Lanczos3 缩到精确尺寸，保证小尺寸 Logo 依然平滑。

use image::{Rgba, RgbaImage};

use super::FontFace;

/// 独立 Logo 资源：画布边长。
pub const WORDMARK_CANVAS: u32 = 800;
/// 独立 Logo 资源：字号。
pub const WORDMARK_FONT_PX: f32 = 400.0;

/// 图标资源：画布边长。
pub const ICON_CANVAS: u32 = 512;
/// 图标资源：白色方块边长。
pub const ICON_SQUARE: u32 = 400;
/// 图标资源：字号。
pub const ICON_FONT_PX: f32 = 280.0;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 在透明画布上居中绘制文字。
pub fn render_text_logo(
    face: &FontFace,
    text: &str,
    width: u32,
    height: u32,
    font_px: f32,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(width.max(1), height.max(1));
    draw_centered(&mut canvas, face, text, font_px, color);
    canvas
}

/// 文字叠加层画布尺寸：`S × S/2`，`S = max(w, 2h)`。
pub fn overlay_canvas_size(target_width: u32, target_height: u32) -> (u32, u32) {
    let side = target_width
        .max(target_height.saturating_mul(2))
        .max(2);
    (side, (side / 2).max(1))
}

/// 合成用的文字叠加层，分辨率不低于目标尺寸。
pub fn render_overlay_logo(
    face: &FontFace,
    text: &str,
    color: Rgba<u8>,
    target_width: u32,
    target_height: u32,
) -> RgbaImage {
    let (width, height) = overlay_canvas_size(target_width, target_height);
    let font_px = width as f32 / 3.0;

    render_text_logo(face, text, width, height, font_px, color)
}

/// 方形图标：透明画布、居中色块、居中文字。
pub fn render_icon(
    face: &FontFace,
    letter: &str,
    size: u32,
    square: u32,
    font_px: f32,
    square_color: Rgba<u8>,
    text_color: Rgba<u8>,
) -> RgbaImage {
    let size = size.max(1);
    let square = square.min(size);
    let mut canvas = RgbaImage::new(size, size);

    let offset = (size - square) / 2;
    for y in offset..offset + square {
        for x in offset..offset + square {
            canvas.put_pixel(x, y, square_color);
        }
    }

    draw_centered(&mut canvas, face, letter, font_px, text_color);
    canvas
}

/// 独立 Logo 预设：800×800 透明画布，400px 白字。
pub fn render_wordmark(face: &FontFace, text: &str) -> RgbaImage {
    render_text_logo(
        face,
        text,
        WORDMARK_CANVAS,
        WORDMARK_CANVAS,
        WORDMARK_FONT_PX,
        WHITE,
    )
}

/// 图标预设：512 画布，400 白色方块，280px 黑字。
pub fn render_brand_icon(face: &FontFace, letter: &str) -> RgbaImage {
    render_icon(
        face,
        letter,
        ICON_CANVAS,
        ICON_SQUARE,
        ICON_FONT_PX,
        WHITE,
        BLACK,
    )
}

fn draw_centered(canvas: &mut RgbaImage, face: &FontFace, text: &str, font_px: f32, color: Rgba<u8>) {
    let Some(bounds) = face.text_bounds(text, font_px) else {
        return;
    };

    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let x = (width - bounds.width()) / 2 - bounds.min_x;
    let y = (height - bounds.height()) / 2 - bounds.min_y;

    face.draw(canvas, text, font_px, x, y, color);
}
