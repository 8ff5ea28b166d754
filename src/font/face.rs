//! 字体外观抽象
//!
//! 探测链产出的字体有两种：`rusttype` 解析的矢量字体，以及内置点阵字体。
//! 两者对外提供同一组操作：测量墨迹包围盒、在画布上绘制。
//!
//! 坐标约定与绘制原点一致：`(x, y)` 是文字行的左上角（矢量字体的基线位于 `y + ascent`）。

use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};

use crate::compositor::blend_pixel;

use super::bitmap;

/// 文字墨迹包围盒（相对绘制原点，右/下边界为开区间）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    fn union(self, other: TextBounds) -> TextBounds {
        TextBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// 已加载的字体。
pub enum FontFace {
    Outline {
        font: Font<'static>,
        origin: String,
    },
    Bitmap,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl FontFace {
    /// 从字体文件字节解析；`.ttc` 取第 0 个字体。
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<String>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self::Outline {
            font,
            origin: origin.into(),
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Outline { origin, .. } => format!("outline({})", origin),
            Self::Bitmap => "builtin-bitmap".to_string(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Bitmap)
    }

    /// 测量文字墨迹；没有任何可见墨迹时返回 `None`。
    pub fn text_bounds(&self, text: &str, font_px: f32) -> Option<TextBounds> {
        match self {
            Self::Outline { font, .. } => {
                let scale = Scale::uniform(font_px);
                let ascent = font.v_metrics(scale).ascent;
                font.layout(text, scale, point(0.0, ascent))
                    .filter_map(|glyph| glyph.pixel_bounding_box())
                    .map(|bb| TextBounds {
                        min_x: bb.min.x,
                        min_y: bb.min.y,
                        max_x: bb.max.x,
                        max_y: bb.max.y,
                    })
                    .reduce(TextBounds::union)
            }
            Self::Bitmap => {
                let dot = bitmap::dot_size(font_px) as i32;
                let advance = (bitmap::GLYPH_COLUMNS + bitmap::GLYPH_SPACING) as i32 * dot;
                text.chars()
                    .enumerate()
                    .filter_map(|(index, ch)| {
                        let rows = bitmap::glyph(ch);
                        let mut ink: Option<TextBounds> = None;
                        for row in 0..bitmap::GLYPH_ROWS {
                            for column in 0..bitmap::GLYPH_COLUMNS {
                                if !bitmap::is_set(&rows, column, row) {
                                    continue;
                                }
                                let x = index as i32 * advance + column as i32 * dot;
                                let y = row as i32 * dot;
                                let cell = TextBounds {
                                    min_x: x,
                                    min_y: y,
                                    max_x: x + dot,
                                    max_y: y + dot,
                                };
                                ink = Some(ink.map_or(cell, |b| b.union(cell)));
                            }
                        }
                        ink
                    })
                    .reduce(TextBounds::union)
            }
        }
    }

    /// 以 `(x, y)` 为行左上角绘制文字，按覆盖率做抗锯齿混合。
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        font_px: f32,
        x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        match self {
            Self::Outline { font, .. } => {
                let scale = Scale::uniform(font_px);
                let ascent = font.v_metrics(scale).ascent;
                for glyph in font.layout(text, scale, point(x as f32, y as f32 + ascent)) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let px = bb.min.x + gx as i32;
                        let py = bb.min.y + gy as i32;
                        blend_coverage(canvas, px, py, color, coverage);
                    });
                }
            }
            Self::Bitmap => {
                let dot = bitmap::dot_size(font_px) as i32;
                let advance = (bitmap::GLYPH_COLUMNS + bitmap::GLYPH_SPACING) as i32 * dot;
                for (index, ch) in text.chars().enumerate() {
                    let rows = bitmap::glyph(ch);
                    let origin_x = x + index as i32 * advance;
                    for row in 0..bitmap::GLYPH_ROWS {
                        for column in 0..bitmap::GLYPH_COLUMNS {
                            if !bitmap::is_set(&rows, column, row) {
                                continue;
                            }
                            let cell_x = origin_x + column as i32 * dot;
                            let cell_y = y + row as i32 * dot;
                            for dy in 0..dot {
                                for dx in 0..dot {
                                    blend_coverage(canvas, cell_x + dx, cell_y + dy, color, 1.0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn blend_coverage(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }

    let mask = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
    blend_pixel(canvas.get_pixel_mut(x, y), color, mask);
}
