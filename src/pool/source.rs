//! # 资源来源模型

use std::path::PathBuf;

use crate::error::LoadError;

const INLINE_PREFIX: &str = "inline:";

/// 码池资源来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolSource {
    /// `http://` / `https://` 远程资源
    Url(String),
    /// 本地文件
    File(PathBuf),
    /// 直接给出的 CSV 文本
    Inline(String),
}

impl PoolSource {
    /// 按前缀识别资源位置。
    pub fn parse(location: &str) -> Result<Self, LoadError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(LoadError::InvalidLocation("资源地址为空".to_string()));
        }

        // 只去掉前导空白，inline 文本本身原样保留
        if let Some(text) = location.trim_start().strip_prefix(INLINE_PREFIX) {
            return Ok(Self::Inline(text.to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(trimmed.to_string()));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// 日志用的简短描述。
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => redact_url_for_log(url),
            Self::File(path) => path.display().to_string(),
            Self::Inline(text) => format!("inline（{} 字节）", text.len()),
        }
    }
}

/// 只保留 scheme、主机、端口与路径，去掉用户信息、查询串与片段。
fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}
