//! 设计规格模型模块
//!
//! # 设计思路
//!
//! 设计规格 JSON 由外部流程生成，本模块只负责把它读成强类型结构，
//! 不做任何业务判断（是否处理、坐标换算都在下游完成）。
//!
//! ```json
//! [
//!   {
//!     "image": "hoodie-front.jpg",
//!     "variants": [
//!       {
//!         "variant": "chest-left",
//!         "success": true,
//!         "designSpec": {
//!           "coordinates": { "top": "22%", "left": "58%", "width": "14%", "height": "5%" }
//!         }
//!       }
//!     ]
//!   }
//! ]
//! ```
//!
//! # 实现思路
//!
//! - 缺失的 `success` 视为 `false`，缺失的 `designSpec` / `coordinates` 视为全部默认。
//! - 百分比允许写成字符串（`"10%"`）或数字（`10`），统一由 `PercentValue` 承载；
//!   其他类型的值保留到下游，只让对应的 (image, variant) 失败。
//! - 文件缺失或解析失败属于配置错误，返回 `AppError::Config`。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

/// 单张源图及其所有变体。
#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub image: String,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
}

/// 单个变体的放置方案。
#[derive(Debug, Clone, Deserialize)]
pub struct VariantEntry {
    pub variant: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "designSpec")]
    pub design_spec: DesignSpecBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignSpecBody {
    #[serde(default)]
    pub coordinates: Coordinates,
}

/// 四个百分比坐标，任一字段都可能缺省。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub top: Option<PercentValue>,
    #[serde(default)]
    pub left: Option<PercentValue>,
    #[serde(default)]
    pub width: Option<PercentValue>,
    #[serde(default)]
    pub height: Option<PercentValue>,
}

/// 百分比原始值：`"12.5%"` 或 `12.5`。
///
/// 其他 JSON 类型（布尔、对象、数组）落到 `Other`，由坐标换算阶段判为单项错误，
/// 不影响整份文件的解析。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PercentValue {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

impl From<&str> for PercentValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// 批处理的最小单元：一张源图上的一个变体。
#[derive(Debug, Clone)]
pub struct DesignSpec<'a> {
    pub image: &'a str,
    pub variant: &'a str,
    pub success: bool,
    pub coordinates: &'a Coordinates,
}

impl ImageEntry {
    /// 按输入顺序展开为 (image, variant) 记录。
    pub fn design_specs(&self) -> impl Iterator<Item = DesignSpec<'_>> {
        self.variants.iter().map(move |variant| DesignSpec {
            image: &self.image,
            variant: &variant.variant,
            success: variant.success,
            coordinates: &variant.design_spec.coordinates,
        })
    }
}

/// 解析设计规格 JSON 文本。
pub fn parse_design_specs(content: &str) -> Result<Vec<ImageEntry>, AppError> {
    serde_json::from_str(content)
        .map_err(|e| AppError::Config(format!("解析设计规格失败: {}", e)))
}

/// 从文件读取设计规格。
///
/// # 返回
/// - `Ok(Vec<ImageEntry>)` — 按文件顺序排列的源图记录
/// - `Err(AppError::Config)` — 文件不存在、不可读或不是合法 JSON
pub fn load_design_specs(path: &Path) -> Result<Vec<ImageEntry>, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "设计规格文件不存在: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("读取设计规格文件 '{}' 失败: {}", path.display(), e))
    })?;

    let entries = parse_design_specs(&content)?;
    log::info!(
        "📋 已加载设计规格 - 源图 {} 张，变体 {} 个",
        entries.len(),
        entries.iter().map(|entry| entry.variants.len()).sum::<usize>()
    );
    Ok(entries)
}
