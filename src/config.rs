//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有可调策略集中到 `PickerConfig`：资源位置、列名、缺失值策略、
//! 反馈复位延迟、网络超时与体积上限，以及前端展示用的兑换步骤。
//!
//! ## 实现思路
//!
//! - `Default` 提供与原网页一致的行为（`Promotion code` 列、2 秒复位）。
//! - 所有字段 `#[serde(default)]`，配置文件只需写想覆盖的项。
//! - 配置文件不存在时回退默认值；存在但无法解析时返回 `ConfigError`。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SOURCE: &str = "promocodes.csv";
pub const DEFAULT_CODE_COLUMN: &str = "Promotion code";
pub const DEFAULT_FEEDBACK_RESET_MS: u64 = 2_000;

/// 缺失码值的数据行如何处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingCodePolicy {
    /// 保留为占位（`None`），与原网页行为一致
    #[default]
    Keep,
    /// 直接丢弃该行
    Skip,
}

/// 优惠码选择器配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// 资源位置：本地路径、`http(s)://` URL 或 `inline:` 文本。
    pub source: String,
    /// 码值所在列的表头名（精确匹配）。
    pub code_column: String,
    pub missing_code_policy: MissingCodePolicy,
    /// 复制成功后反馈标志的复位延迟（毫秒）。
    pub feedback_reset_ms: u64,
    /// 建立连接超时时间（毫秒）。
    pub connect_timeout_ms: u64,
    /// 整体请求超时时间（毫秒）。
    pub request_timeout_ms: u64,
    /// 允许的资源最大体积（字节）。
    pub max_resource_bytes: u64,
    /// `--once` 退出前等待其他程序接管剪贴板的最长时间（毫秒），0 表示不等待。
    pub clipboard_handover_ms: u64,
    /// 商店链接，仅用于展示。
    pub store_url: Option<String>,
    pub redeem_steps: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            code_column: DEFAULT_CODE_COLUMN.to_string(),
            missing_code_policy: MissingCodePolicy::Keep,
            feedback_reset_ms: DEFAULT_FEEDBACK_RESET_MS,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 15_000,
            max_resource_bytes: 4 * 1024 * 1024,
            clipboard_handover_ms: 30_000,
            store_url: None,
            redeem_steps: default_redeem_steps(),
        }
    }
}

fn default_redeem_steps() -> Vec<String> {
    [
        "Open the BlockerPlus app on your device",
        "Navigate to Premium Purchase Page",
        "Select 12 months Plan",
        "Start the checkout process",
        "Look for the \"Redeem\" option",
        "Enter your promo code",
        "Complete the purchase process",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PickerConfig {
    pub fn feedback_reset_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_reset_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 剪贴板接管等待时长；0 时返回 `None`。
    pub fn clipboard_handover(&self) -> Option<Duration> {
        (self.clipboard_handover_ms > 0).then(|| Duration::from_millis(self.clipboard_handover_ms))
    }

    /// 校验配置项取值。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::Invalid("source 不能为空".to_string()));
        }
        if self.code_column.trim().is_empty() {
            return Err(ConfigError::Invalid("code_column 不能为空".to_string()));
        }
        if self.max_resource_bytes == 0 {
            return Err(ConfigError::Invalid("max_resource_bytes 必须大于 0".to_string()));
        }
        Ok(())
    }
}

/// 从 JSON 文件读取配置
///
/// # 返回
/// - 文件不存在：`Ok(PickerConfig::default())`
/// - 文件存在且合法：`Ok(config)`
/// - 读取或解析失败：`Err(ConfigError)`
pub fn load_config_from_path(path: &Path) -> Result<PickerConfig, ConfigError> {
    if !path.exists() {
        log::debug!("配置文件不存在，使用默认配置: {}", path.display());
        return Ok(PickerConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: PickerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    log::info!("⚙️ 已加载配置文件: {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("promo_picker_{}_{}.json", name, nanos))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_path("missing");
        let config = load_config_from_path(&path).expect("defaults expected");
        assert_eq!(config.code_column, DEFAULT_CODE_COLUMN);
        assert_eq!(config.feedback_reset_ms, DEFAULT_FEEDBACK_RESET_MS);
        assert_eq!(config.missing_code_policy, MissingCodePolicy::Keep);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let path = temp_path("partial");
        fs::write(&path, r#"{"source":"codes.csv","missing_code_policy":"skip"}"#)
            .expect("write config failed");

        let config = load_config_from_path(&path).expect("config should parse");
        let _ = fs::remove_file(&path);

        assert_eq!(config.source, "codes.csv");
        assert_eq!(config.missing_code_policy, MissingCodePolicy::Skip);
        assert_eq!(config.code_column, DEFAULT_CODE_COLUMN);
        assert_eq!(config.redeem_steps.len(), 7);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").expect("write config failed");

        let result = load_config_from_path(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_handover_disables_waiting() {
        let config = PickerConfig {
            clipboard_handover_ms: 0,
            ..PickerConfig::default()
        };
        assert_eq!(config.clipboard_handover(), None);
        assert_eq!(
            PickerConfig::default().clipboard_handover(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn empty_column_name_is_rejected() {
        let config = PickerConfig {
            code_column: "  ".to_string(),
            ..PickerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
