//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载合成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让批处理循环可按分支匹配。

/// 合成链路统一错误类型。
///
/// 批处理层捕获后记录为该 (image, variant) 的 `Failed` 结果。
#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    #[error("坐标错误：{0}")]
    InvalidCoordinate(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

