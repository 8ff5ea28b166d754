//! # 缩放与合成流水线模块
//!
//! ## 设计思路
//!
//! 叠加层总是先在不低于目标分辨率的画布上得到，再一次性缩到目标像素尺寸，
//! 之后以叠加层自身的 alpha 通道为蒙版贴到源图上，最后压平成不透明 RGB。
//!
//! ## 实现思路
//!
//! 1. 缩放优先走 `fast_image_resize` 卷积（Lanczos3），失败时回退 `image::imageops::resize`
//! 2. 逐像素按叠加层 alpha 插值合成，越界部分裁掉
//! 3. 压平直接丢弃 alpha 通道

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, Pixel, Rgba, RgbImage, RgbaImage};

use super::CompositorError;

/// 将叠加层缩放到精确的 `(width, height)`。
pub fn resize_overlay(
    overlay: &RgbaImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> RgbaImage {
    if overlay.dimensions() == (width, height) {
        return overlay.clone();
    }

    match resize_with_fast_image_resize(overlay, width, height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize：{}", err);
            image::imageops::resize(overlay, width, height, filter)
        }
    }
}

fn resize_with_fast_image_resize(
    overlay: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, CompositorError> {
    let (src_width, src_height) = overlay.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        overlay.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| CompositorError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| CompositorError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| CompositorError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

/// 以叠加层 alpha 为蒙版贴到 `(left, top)`。
///
/// 每个通道（含 alpha）按 `out = src * a + dst * (1 - a)` 插值，`a` 取叠加层像素的 alpha；
/// alpha 为 0 的像素不触碰源图，超出右/下边界的部分裁掉。
pub fn composite_over(base: &mut RgbaImage, overlay: &RgbaImage, left: u32, top: u32) {
    let (base_width, base_height) = base.dimensions();

    for (ox, oy, src) in overlay.enumerate_pixels() {
        if src[3] == 0 {
            continue;
        }

        let (Some(bx), Some(by)) = (left.checked_add(ox), top.checked_add(oy)) else {
            continue;
        };
        if bx >= base_width || by >= base_height {
            continue;
        }

        blend_pixel(base.get_pixel_mut(bx, by), *src, src[3]);
    }
}

/// 以 `mask` 为权重在 `dst` 与 `src` 之间逐通道插值（四个通道同一权重）。
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>, mask: u8) {
    match mask {
        0 => {}
        u8::MAX => *dst = src,
        _ => dst.apply2(&src, |d, s| mix_channel(s, d, mask)),
    }
}

fn mix_channel(src: u8, dst: u8, mask: u8) -> u8 {
    let weight = mask as u32;
    let mixed = src as u32 * weight + dst as u32 * (255 - weight);
    ((mixed + 127) / 255) as u8
}

/// 压平为不透明 RGB。
pub fn flatten(image: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(image).into_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        })
    }

    #[test]
    fn resized_overlay_reports_requested_dimensions() {
        let source = RgbaImage::from_pixel(600, 300, Rgba([125, 249, 255, 255]));

        for (w, h) in [(200, 100), (1, 1), (37, 91), (600, 300)] {
            let resized = resize_overlay(&source, w, h, FilterType::Lanczos3);
            assert_eq!(resized.dimensions(), (w, h));
        }
    }

    #[test]
    fn resizing_solid_opaque_color_preserves_it() {
        let source = RgbaImage::from_pixel(400, 200, Rgba([125, 249, 255, 255]));
        let resized = resize_overlay(&source, 100, 50, FilterType::Lanczos3);

        let center = resized.get_pixel(50, 25);
        assert_eq!(center[3], 255);
        assert!((center[0] as i32 - 125).abs() <= 1);
        assert!((center[1] as i32 - 249).abs() <= 1);
    }

    #[test]
    fn transparent_overlay_leaves_base_identical() {
        let original = gradient(120, 80);
        let mut base = original.clone();
        let overlay = RgbaImage::from_pixel(50, 30, Rgba([255, 0, 0, 0]));

        composite_over(&mut base, &overlay, 10, 20);

        assert_eq!(base, original);
        assert_eq!(flatten(base), flatten(original));
    }

    #[test]
    fn opaque_overlay_replaces_covered_pixels_only() {
        let mut base = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(5, 5, Rgba([10, 20, 30, 255]));

        composite_over(&mut base, &overlay, 4, 6);

        assert_eq!(*base.get_pixel(4, 6), Rgba([10, 20, 30, 255]));
        assert_eq!(*base.get_pixel(8, 10), Rgba([10, 20, 30, 255]));
        assert_eq!(*base.get_pixel(9, 6), Rgba([0, 0, 0, 255]));
        assert_eq!(*base.get_pixel(3, 6), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn half_transparent_overlay_blends() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 128]));

        composite_over(&mut base, &overlay, 0, 0);

        // 200 * 128/255 ≈ 100；alpha 通道同样插值：128 * 128/255 + 255 * 127/255 ≈ 191
        assert_eq!(*base.get_pixel(1, 1), Rgba([100, 100, 100, 191]));
    }

    #[test]
    fn translucent_base_is_interpolated_not_replaced() {
        let mut base = RgbaImage::from_pixel(3, 3, Rgba([50, 50, 50, 0]));
        let overlay = RgbaImage::from_pixel(3, 3, Rgba([200, 200, 200, 128]));

        composite_over(&mut base, &overlay, 0, 0);

        assert_eq!(*base.get_pixel(1, 1), Rgba([125, 125, 125, 64]));
        assert_eq!(flatten(base).get_pixel(1, 1).0, [125, 125, 125]);
    }

    #[test]
    fn mask_extremes_copy_or_keep() {
        let mut pixel = Rgba([1, 2, 3, 4]);
        blend_pixel(&mut pixel, Rgba([9, 9, 9, 9]), 0);
        assert_eq!(pixel, Rgba([1, 2, 3, 4]));

        blend_pixel(&mut pixel, Rgba([9, 9, 9, 9]), 255);
        assert_eq!(pixel, Rgba([9, 9, 9, 9]));
    }

    #[test]
    fn overlay_past_the_edge_is_clipped() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));

        composite_over(&mut base, &overlay, 6, 6);

        assert_eq!(base.dimensions(), (10, 10));
        assert_eq!(*base.get_pixel(9, 9), Rgba([255, 255, 255, 255]));
        assert_eq!(*base.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn flatten_drops_alpha() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255]));
        let flat = flatten(image);

        assert_eq!(flat.dimensions(), (3, 2));
        assert_eq!(flat.get_pixel(2, 1).0, [9, 8, 7]);
    }
}
