//! # 运行设置
//!
//! ## 设计思路
//!
//! 所有路径、Logo 文案/颜色与字体候选都放在一个可选的 JSON 设置文件里，
//! 缺省字段由 `#[serde(default)]` 补齐，命令行参数再覆盖其上。
//!
//! ## 实现思路
//!
//! - 设置文件不存在、无法读取或格式错误时记录警告并使用默认设置，不中止运行。
//! - 颜色以 `#RRGGBB` 字符串保存，进入合成链路前才解析为 `Rgba`。

use std::fs;
use std::path::{Path, PathBuf};

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::compositor::{CompositorConfig, DEFAULT_LOGO_TEXT};
use crate::error::AppError;

pub const DEFAULT_SPECS_FILE: &str = "public/images/hoodie-designs/design-specs.json";
pub const DEFAULT_SOURCE_DIR: &str = "hoodie-gallery";
pub const DEFAULT_OUTPUT_DIR: &str = "public/images/hoodie-designs/designed-hoodies";
pub const DEFAULT_LOGO_COLOR: &str = "#7DF9FF";

pub const OSWALD_DOWNLOAD_URL: &str =
    "https://github.com/google/fonts/raw/main/ofl/oswald/Oswald%5Bwght%5D.ttf";
pub const OSWALD_CACHE_PATH: &str = "fonts/Oswald-VariableFont_wght.ttf";
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 20;

/// 字体候选设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// 首选字体路径（按顺序尝试）。
    pub preferred_paths: Vec<PathBuf>,
    /// 可选的下载地址；为空时跳过下载。
    pub download_url: Option<String>,
    /// 下载字体的缓存文件。
    pub download_cache: PathBuf,
    pub download_timeout_secs: u64,
    /// 回退字体路径（按顺序尝试）。
    pub fallback_paths: Vec<PathBuf>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            preferred_paths: vec![
                PathBuf::from("/System/Library/Fonts/Supplemental/Oswald-Bold.ttf"),
                PathBuf::from("/Library/Fonts/Oswald-Bold.ttf"),
            ],
            download_url: Some(OSWALD_DOWNLOAD_URL.to_string()),
            download_cache: PathBuf::from(OSWALD_CACHE_PATH),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            fallback_paths: vec![
                PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
                PathBuf::from("/System/Library/Fonts/Supplemental/Arial Bold.ttf"),
                PathBuf::from("/System/Library/Fonts/Arial Bold.ttf"),
                PathBuf::from("C:/Windows/Fonts/arialbd.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            ],
        }
    }
}

/// 运行设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub specs_file: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub logo_text: String,
    /// `#RRGGBB`
    pub logo_color: String,
    /// 现成 Logo PNG；设置后不再合成文字 Logo。
    pub logo_file: Option<PathBuf>,
    pub fonts: FontSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            specs_file: PathBuf::from(DEFAULT_SPECS_FILE),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            logo_text: DEFAULT_LOGO_TEXT.to_string(),
            logo_color: DEFAULT_LOGO_COLOR.to_string(),
            logo_file: None,
            fonts: FontSettings::default(),
        }
    }
}

impl Settings {
    /// 由设置派生合成配置，并做一次完整校验。
    pub fn compositor_config(&self) -> Result<CompositorConfig, AppError> {
        let config = CompositorConfig {
            logo_color: parse_hex_color(&self.logo_color)?,
            logo_text: self.logo_text.clone(),
            ..CompositorConfig::default()
        };
        config
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(config)
    }
}

/// 读取设置文件；任何问题都回退到默认设置。
pub fn load_settings_from_path(path: &Path) -> Settings {
    if !path.exists() {
        log::warn!("⚠️ 设置文件不存在，使用默认设置: {}", path.display());
        return Settings::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("⚠️ 读取设置文件失败，使用默认设置 {}: {}", path.display(), err);
            return Settings::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(settings) => {
            log::info!("⚙️ 已加载设置文件: {}", path.display());
            settings
        }
        Err(err) => {
            log::warn!("⚠️ 解析设置文件失败，使用默认设置 {}: {}", path.display(), err);
            Settings::default()
        }
    }
}

pub fn save_settings_to_path(path: &Path, settings: &Settings) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Storage(format!("创建设置目录失败: {}", e)))?;
    }
    fs::write(path, content)
        .map_err(|e| AppError::Storage(format!("写入设置文件失败: {}", e)))?;
    Ok(())
}

/// 解析 `#RRGGBB`（`#` 可省略）为不透明颜色。
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, AppError> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Config(format!("无效的颜色值: {}", value)));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| AppError::Config(format!("无效的颜色值 {}: {}", value, e)))
    };

    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}
