//! # Logo 合成模块（compositor）
//!
//! ## 设计思路
//!
//! 该模块将“坐标换算 → 源图加载 → 叠加层准备 → 缩放 → 合成 → 压平”
//! 按职责拆分为多个子模块：
//!
//! - `config`：默认坐标、Logo 颜色、缩放滤镜与资源上限
//! - `placement`：百分比解析、夹取与像素换算
//! - `loader`：源图 / 现成 Logo 的读取与安全校验
//! - `pipeline`：叠加层缩放、按 alpha 蒙版插值合成、压平为 RGB
//! - `handler`：`LogoCompositor` 编排整条链路
//! - `error/source`：错误与中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! batch.rs（逐个 (image, variant)）
//!    ↓
//! handler.rs（apply_to_file：加载 + place_logo + 保存）
//!    ├─ loader.rs（文件存在性 / 体积 / 签名 / 像素上限）
//!    ├─ placement.rs（百分比 → 像素）
//!    ├─ font（文字 Logo 合成，仅 Text 来源）
//!    └─ pipeline.rs（Lanczos3 缩放 + alpha 合成 + 压平）
//!    ↓
//! 返回 CompositorError 给批处理层
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod placement;
mod source;

pub use config::{CompositorConfig, DEFAULT_LOGO_TEXT, DefaultCoordinates, NEON_CYAN};
pub use error::CompositorError;
pub use handler::LogoCompositor;
pub use pipeline::{composite_over, flatten, resize_overlay};
pub(crate) use pipeline::blend_pixel;
pub use placement::{
    PercentRect, PixelPlacement, parse_percentage, percent_to_pixels, resolve_percentages,
};
pub use source::OverlaySource;
