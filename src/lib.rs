//! # 优惠码选择器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              终端前端 (main.rs, clap + stdin)             │
//! │        g 生成 ── c 复制 ── s 状态 ── q 退出               │
//! └───────┬───────────────────────────────┬──────────────────┘
//!         ↓ 启动时后台加载（一次）          ↓ 用户操作
//! ┌───────┼───────────────────────────────┼──────────────────┐
//! │  pool ──── 来源识别 → 获取 → CSV 解析 │                   │
//! │       │                               ↓                  │
//! │       └──→ Session（码池 / 已选中 / 复制反馈）             │
//! │                          ↑                               │
//! │  selector ─── draw（均匀随机）/ copy（ClipboardSink）     │
//! │  feedback ─── 可取消的单一复位任务                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | `LoadError` / `SelectError` / `ClipboardError` / `ConfigError` 与统一的 `AppError` |
//! | [`config`] | `PickerConfig` 与 JSON 配置文件读取 |
//! | [`pool`] | 码池来源识别、获取、解析与启动加载 |
//! | [`session`] | 会话状态句柄，显式传入加载器与选择器 |
//! | [`selector`] | 随机抽取与复制到剪贴板 |
//! | [`feedback`] | 复制反馈标志及其复位任务 |
//! | [`clipboard`] | `ClipboardSink` 抽象、arboard 实现与内存实现 |
//! | [`view`] | 终端文本渲染 |

pub mod error;
pub mod clipboard;
pub mod config;
pub mod feedback;
pub mod pool;
pub mod selector;
pub mod session;
pub mod view;

pub use error::AppError;
pub use session::Session;
