//! # 批处理模块
//!
//! ## 设计思路
//!
//! 逐个 (image, variant) 驱动合成，单项失败不影响整次运行：
//!
//! ```text
//! 源图缺失        → 该图所有 variant 记为 Skipped，继续下一张图
//! success = false → Skipped（不计为失败，不产生输出）
//! 合成/写出失败   → Failed（记录原因，继续）
//! 成功            → Written(输出路径)
//! ```
//!
//! 所有结果汇总到 `RunSummary`，运行结束时统一输出日志。
//!
//! ## 实现思路
//!
//! - 只有设计规格文件缺失/格式错误、输出目录不可用、现成 Logo 无法加载这类
//!   配置问题才让 `run_apply` 返回 `Err`。
//! - 现成 Logo 每次运行只解码一次，以 `OverlaySource::Raster` 复用。

use std::path::{Path, PathBuf};

use crate::compositor::{LogoCompositor, OverlaySource};
use crate::design_spec::{ImageEntry, load_design_specs};
use crate::error::AppError;
use crate::font::FontChain;
use crate::settings::Settings;
use crate::storage;

/// 单个 (image, variant) 的处理结果。
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Written(PathBuf),
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub image: String,
    pub variant: String,
    pub outcome: ItemOutcome,
}

/// 一次运行的汇总。
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub images_total: usize,
    pub images_missing: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
    pub reports: Vec<ItemReport>,
}

impl RunSummary {
    fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            ..Self::default()
        }
    }

    fn record(&mut self, image: &str, variant: &str, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Written(_) => self.written += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
        self.reports.push(ItemReport {
            image: image.to_string(),
            variant: variant.to_string(),
            outcome,
        });
    }

    pub fn outcome_of(&self, image: &str, variant: &str) -> Option<&ItemOutcome> {
        self.reports
            .iter()
            .find(|report| report.image == image && report.variant == variant)
            .map(|report| &report.outcome)
    }

    pub fn log(&self) {
        log::info!(
            "🏁 处理完成 - 图片 {} 张（缺失 {}），写出 {}，跳过 {}，失败 {}，输出目录: {}",
            self.images_total,
            self.images_missing,
            self.written,
            self.skipped,
            self.failed,
            self.output_dir.display()
        );
    }
}

/// 对全部设计规格执行合成。
pub fn run_batch(
    compositor: &LogoCompositor,
    overlay: &OverlaySource,
    entries: &[ImageEntry],
    source_dir: &Path,
    output_dir: &Path,
) -> RunSummary {
    let mut summary = RunSummary::new(output_dir);

    for entry in entries {
        summary.images_total += 1;
        let image_path = source_dir.join(&entry.image);

        if !image_path.is_file() {
            summary.images_missing += 1;
            log::warn!(
                "⚠️ 源图不存在，跳过其 {} 个 variant: {}",
                entry.variants.len(),
                image_path.display()
            );
            for spec in entry.design_specs() {
                summary.record(
                    spec.image,
                    spec.variant,
                    ItemOutcome::Skipped("源图不存在".to_string()),
                );
            }
            continue;
        }

        log::info!("🖼️ 处理 {}", entry.image);

        for spec in entry.design_specs() {
            if !spec.success {
                log::debug!("⏭️ {} / {} 未标记成功，跳过", spec.image, spec.variant);
                summary.record(
                    spec.image,
                    spec.variant,
                    ItemOutcome::Skipped("success = false".to_string()),
                );
                continue;
            }

            let output_path = storage::output_path(output_dir, spec.image, spec.variant);
            let outcome = match compositor.apply_to_file(
                &image_path,
                spec.coordinates,
                overlay,
                &output_path,
            ) {
                Ok(placement) => {
                    log::info!(
                        "  ✅ {} → {} ({}x{} @ {},{})",
                        spec.variant,
                        output_path.display(),
                        placement.width,
                        placement.height,
                        placement.left,
                        placement.top
                    );
                    ItemOutcome::Written(output_path)
                }
                Err(err) => {
                    log::warn!("  ❌ {} / {} 处理失败: {}", spec.image, spec.variant, err);
                    ItemOutcome::Failed(err.to_string())
                }
            };
            summary.record(spec.image, spec.variant, outcome);
        }
    }

    summary
}

/// `apply` 命令：按设置完成一次完整运行。
pub fn run_apply(settings: &Settings) -> Result<RunSummary, AppError> {
    let entries = load_design_specs(&settings.specs_file)?;
    let config = settings.compositor_config()?;
    let output_dir = storage::prepare_output_dir(&settings.output_dir)?;

    let compositor = LogoCompositor::new(config, FontChain::from_settings(&settings.fonts));

    let overlay = match &settings.logo_file {
        Some(path) => {
            let image = LogoCompositor::load_overlay_file(path, compositor.config())
                .map_err(|e| {
                    AppError::Config(format!("无法加载 Logo 文件 {}: {}", path.display(), e))
                })?;
            OverlaySource::Raster(image)
        }
        None => compositor.default_text_overlay(),
    };

    let summary = run_batch(
        &compositor,
        &overlay,
        &entries,
        &settings.source_dir,
        &output_dir,
    );
    summary.log();
    Ok(summary)
}
