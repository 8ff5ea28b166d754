//! # MH5 Logo 合成工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 main.rs (clap 命令行)                    │
//! │   apply ── create-logo ── create-icon ── init-config     │
//! └───────┬──────────────────────┬───────────────────────────┘
//!         ↓                      ↓
//! ┌───────┴──────────┐   ┌───────┴──────────┐
//! │ batch            │   │ assets           │
//! │ 逐项合成 + 汇总  │   │ 独立 Logo / 图标 │
//! └───┬──────────────┘   └───────┬──────────┘
//!     │                          │
//!     ├─ design_spec   设计规格 JSON 模型
//!     ├─ compositor    百分比 → 像素 · 缩放 · alpha 合成 · 压平
//!     ├─ font          字体探测链 · 文字渲染   ←────────┘
//!     ├─ storage       输出目录与文件命名
//!     └─ settings      设置文件 + 默认值
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 致命错误类型 `AppError`（配置错误 / 存储错误） |
//! | [`design_spec`] | 设计规格 JSON 的强类型模型与加载 |
//! | [`compositor`] | 坐标换算、源图加载、叠加层缩放、alpha 合成、压平为 RGB |
//! | [`font`] | 字体探测链（本地 → 下载 → 回退 → 内置点阵）与文字 Logo 渲染 |
//! | [`batch`] | 批处理循环、逐项结果与运行汇总 |
//! | [`assets`] | `create-logo` / `create-icon` 资源生成 |
//! | [`storage`] | 输出目录准备与输出文件命名 |
//! | [`settings`] | 运行设置的读取、保存与默认值 |

pub mod error;
pub mod assets;
pub mod batch;
pub mod compositor;
pub mod design_spec;
pub mod font;
pub mod settings;
pub mod storage;
