//! 统一错误类型模块
//!
//! # 设计思路
//!
//! `AppError` 只承载会中止整个命令的错误：
//! - **配置错误**（设计规格 JSON 缺失或无法解析、设置值无效、现成 Logo 无法加载）
//! - **存储错误**（输出目录不可用、单个输出文件无法写出）
//!
//! 单项错误（源图损坏、坐标格式错误、合成失败等）是 `CompositorError`，
//! 由批处理循环捕获并记为该 (image, variant) 的 `Failed` 结果，不会上升为 `AppError`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 任一 `AppError` 到达 `main` 都以非零状态退出。

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 设计规格或设置无效（整次运行中止）
    #[error("配置错误: {0}")]
    Config(String),

    /// 输出目录或输出文件不可写
    #[error("存储错误: {0}")]
    Storage(String),
}
