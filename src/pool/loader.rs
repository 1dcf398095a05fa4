//! # 加载模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（URL / 本地文件 / inline）的文本获取，
//! 在读取前后做体积校验，尽早失败。
//!
//! ## 实现思路
//!
//! - URL：`reqwest` 单次 GET，连接/整体超时，状态码与 `Content-Length` 校验。
//! - 文件：metadata 体积校验后 `tokio::fs` 读取。
//! - 启动加载任务吞掉错误只记日志（码池保持为空，不重试）；
//!   库函数本身返回 `Result`，由调用方决定如何处理。

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{CodePool, PoolSource, parse_codes};
use crate::config::PickerConfig;
use crate::error::LoadError;
use crate::session::Session;

const BUFFER_INITIAL_CAPACITY: usize = 8 * 1024;

/// 获取并解析码池，不涉及会话。
pub async fn load(source: &PoolSource, config: &PickerConfig) -> Result<CodePool, LoadError> {
    log::info!("🌐 开始加载优惠码 - 来源: {}", source.describe());

    let text = fetch_text(source, config).await?;
    let pool = parse_codes(&text, &config.code_column, config.missing_code_policy)?;

    log::info!(
        "✅ 优惠码加载完成 - 共 {} 项（占位 {} 项）",
        pool.len(),
        pool.placeholder_count()
    );
    Ok(pool)
}

/// 按会话配置加载码池并发布到会话，返回条目数。
pub async fn load_into_session(session: &Session) -> Result<usize, LoadError> {
    if session.is_loaded() {
        return Err(LoadError::AlreadyLoaded);
    }

    let config = session.config();
    let source = PoolSource::parse(&config.source)?;
    let pool = load(&source, config).await?;
    let len = pool.len();
    session.publish_pool(pool)?;
    Ok(len)
}

/// 启动时的后台加载：不阻塞前端，失败只记日志。
pub fn spawn_startup_load(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = load_into_session(&session).await {
            log::error!("加载优惠码失败: {}", err);
        }
    })
}

async fn fetch_text(source: &PoolSource, config: &PickerConfig) -> Result<String, LoadError> {
    match source {
        PoolSource::Url(url) => fetch_url(url, config).await,
        PoolSource::File(path) => {
            let metadata = tokio::fs::metadata(path).await?;
            check_size(metadata.len(), config.max_resource_bytes)?;
            Ok(tokio::fs::read_to_string(path).await?)
        }
        PoolSource::Inline(text) => {
            check_size(text.len() as u64, config.max_resource_bytes)?;
            Ok(text.clone())
        }
    }
}

async fn fetch_url(url: &str, config: &PickerConfig) -> Result<String, LoadError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| LoadError::InvalidLocation(format!("URL 格式错误：{}", e)))?;

    let client = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| LoadError::Network(format!("创建 HTTP 客户端失败：{}", e)))?;

    log::debug!("📡 发送 HTTP 请求...");
    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus(status.as_u16()));
    }

    let total_len = response.content_length();
    if let Some(len) = total_len {
        check_size(len, config.max_resource_bytes)?;
    }

    // 分块读取，累计超限立即失败，不等整个响应体缓冲完
    let initial_capacity = total_len
        .map(|len| len.min(config.max_resource_bytes).min(usize::MAX as u64) as usize)
        .unwrap_or(BUFFER_INITIAL_CAPACITY);
    let mut buffer = Vec::with_capacity(initial_capacity);
    let mut response = response;
    let mut total: u64 = 0;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| LoadError::Network(format!("读取响应失败：{}", e)))?
    {
        total = total.saturating_add(chunk.len() as u64);
        check_size(total, config.max_resource_bytes)?;
        buffer.extend_from_slice(&chunk);
    }

    String::from_utf8(buffer)
        .map_err(|e| LoadError::Parse(format!("资源不是有效的 UTF-8 文本：{}", e)))
}

fn check_size(len: u64, limit: u64) -> Result<(), LoadError> {
    if len > limit {
        return Err(LoadError::ResourceLimit(format!(
            "资源过大：{} 字节（限制：{} 字节）",
            len, limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn session_for(source: &str) -> Session {
        let config = PickerConfig {
            source: source.to_string(),
            ..PickerConfig::default()
        };
        Session::new(config, Arc::new(MemoryClipboard::new()))
    }

    #[tokio::test]
    async fn inline_source_loads_into_session_once() {
        let session = session_for("inline:Promotion code\nABC123\nXYZ789\n");

        let len = load_into_session(&session).await.expect("load failed");
        assert_eq!(len, 2);

        let again = load_into_session(&session).await;
        assert!(matches!(again, Err(LoadError::AlreadyLoaded)));
        assert_eq!(session.pool().len(), 2);
    }

    #[tokio::test]
    async fn file_source_is_read_from_disk() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!("promo_codes_{}.csv", nanos));
        std::fs::write(&path, "Promotion code\nFILE1\n").expect("write csv failed");

        let session = session_for(&path.display().to_string());
        let result = load_into_session(&session).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(result.expect("load failed"), 1);
        assert_eq!(session.pool().codes().collect::<Vec<_>>(), vec!["FILE1"]);
    }

    #[tokio::test]
    async fn missing_file_leaves_pool_empty() {
        let session = session_for("/definitely/not/here/promocodes.csv");

        let result = load_into_session(&session).await;

        assert!(matches!(result, Err(LoadError::Io(_))));
        assert!(!session.is_loaded());
        assert!(session.pool().is_empty());
    }

    #[tokio::test]
    async fn startup_load_swallows_errors() {
        let session = Arc::new(session_for("/definitely/not/here/promocodes.csv"));
        spawn_startup_load(Arc::clone(&session))
            .await
            .expect("startup task panicked");
        assert!(session.pool().is_empty());
    }

    #[tokio::test]
    async fn oversized_inline_resource_is_rejected() {
        let config = PickerConfig {
            max_resource_bytes: 8,
            ..PickerConfig::default()
        };
        let source = PoolSource::Inline("Promotion code\nA\n".to_string());

        let result = load(&source, &config).await;

        assert!(matches!(result, Err(LoadError::ResourceLimit(_))));
    }
}
