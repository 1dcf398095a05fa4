//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 每条链路各自一个错误枚举：加载归 `LoadError`，抽取归 `SelectError`，
//! 剪贴板归 `ClipboardError`，配置归 `ConfigError`。
//! 上层统一收敛为 `AppError`，调用侧决定是否展示给用户。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 子错误通过 `#[from]` 上转为 `AppError`，无需手动 map。
//! - `AppError` 实现 `Serialize`（序列化为字符串），供 `--json` 输出使用。

use serde::Serialize;

/// 码池加载失败（获取或解析阶段）
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("资源地址无效：{0}")]
    InvalidLocation(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("HTTP 状态异常：{0}")]
    HttpStatus(u16),

    #[error("文件错误：{0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失败：{0}")]
    Parse(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 码池每个会话只允许发布一次
    #[error("码池已加载，拒绝重复发布")]
    AlreadyLoaded,
}

impl From<csv::Error> for LoadError {
    fn from(error: csv::Error) -> Self {
        LoadError::Parse(error.to_string())
    }
}

/// 随机抽取失败
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectError {
    /// 码池为空（尚未加载完成，或资源中没有数据行）
    #[error("没有可用的优惠码")]
    EmptyPool,

    #[error("会话状态锁已中毒")]
    StatePoisoned,
}

/// 剪贴板写入失败
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("当前没有已选中的优惠码")]
    NothingSelected,

    /// 平台剪贴板不可用或拒绝写入（如权限不足）
    #[error("剪贴板操作失败：{0}")]
    Platform(String),

    #[error("线程执行失败：{0}")]
    Join(String),
}

/// 配置文件读取/解析失败
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置项无效: {0}")]
    Invalid(String),
}

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Select(#[from] SelectError),

    #[error("{0}")]
    Clipboard(#[from] ClipboardError),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
