//! # 会话状态
//!
//! ## 设计思路
//!
//! 以 `Session` 承载一次运行期间的全部状态，替代全局单例：
//! 1. 码池：`OnceLock`，启动时为空，加载完成后发布一次，此后只读
//! 2. 已选中的码：每次抽取覆盖
//! 3. 复制反馈：见 [`crate::feedback`]
//!
//! 加载器与选择器都显式接收 `&Session`，测试可创建相互独立的实例。

use std::sync::{Arc, Mutex, OnceLock};

use crate::clipboard::ClipboardSink;
use crate::config::PickerConfig;
use crate::error::{LoadError, SelectError};
use crate::feedback::FeedbackState;
use crate::pool::CodePool;

static EMPTY_POOL: CodePool = CodePool::empty();

/// 一次运行的会话状态。
pub struct Session {
    config: PickerConfig,
    pool: OnceLock<CodePool>,
    selected: Mutex<Option<String>>,
    feedback: FeedbackState,
    clipboard: Arc<dyn ClipboardSink>,
}

impl Session {
    pub fn new(config: PickerConfig, clipboard: Arc<dyn ClipboardSink>) -> Self {
        let feedback = FeedbackState::new(config.feedback_reset_delay());
        Self {
            config,
            pool: OnceLock::new(),
            selected: Mutex::new(None),
            feedback,
            clipboard,
        }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// 当前码池；加载完成前返回空池。
    pub fn pool(&self) -> &CodePool {
        self.pool.get().unwrap_or(&EMPTY_POOL)
    }

    pub fn is_loaded(&self) -> bool {
        self.pool.get().is_some()
    }

    /// 发布码池，每个会话仅成功一次。
    pub fn publish_pool(&self, pool: CodePool) -> Result<(), LoadError> {
        self.pool.set(pool).map_err(|_| LoadError::AlreadyLoaded)
    }

    pub fn selected_code(&self) -> Option<String> {
        self.selected
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|p| p.into_inner().clone())
    }

    pub(crate) fn set_selected(&self, code: Option<String>) -> Result<(), SelectError> {
        let mut selected = self.selected.lock().map_err(|_| SelectError::StatePoisoned)?;
        *selected = code;
        Ok(())
    }

    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    pub fn is_copy_feedback_active(&self) -> bool {
        self.feedback.is_active()
    }

    pub(crate) fn clipboard(&self) -> Arc<dyn ClipboardSink> {
        Arc::clone(&self.clipboard)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("loaded", &self.is_loaded())
            .field("pool_len", &self.pool().len())
            .field("selected", &self.selected_code())
            .field("feedback", &self.feedback.is_active())
            .finish()
    }
}
