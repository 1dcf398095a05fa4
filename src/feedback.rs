//! # 复制反馈状态
//!
//! ## 设计思路
//!
//! 复制成功后置 `active = true`，固定延迟后自动复位。
//! 每个反馈周期只有一个可取消的复位任务：再次复制会先取消旧任务再调度新任务，
//! 抽取（draw）会立即复位并取消挂起的任务，避免旧定时器误清新的“已复制”标志。
//!
//! ## 实现思路
//!
//! - 复位任务为 `tokio::spawn` + `tokio::time::sleep`，通过 `JoinHandle::abort` 取消。
//! - `generation` 计数器兜底：即使 abort 未及时生效，过期任务也不会改写状态。
//! - 锁只在同步代码中持有，不跨 `.await`。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct FeedbackInner {
    active: bool,
    generation: u64,
    pending_reset: Option<JoinHandle<()>>,
}

impl FeedbackInner {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
    }
}

/// 复制反馈标志及其复位任务。
#[derive(Debug, Clone)]
pub struct FeedbackState {
    inner: Arc<Mutex<FeedbackInner>>,
    reset_delay: Duration,
}

impl FeedbackState {
    pub fn new(reset_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedbackInner::default())),
            reset_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedbackInner> {
        // 状态只有布尔值与任务句柄，锁中毒时沿用内部值即可
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// 置为已复制，并重新调度唯一的复位任务。
    ///
    /// 需要在 tokio 运行时内调用；没有运行时则不调度复位，标志保持到下一次抽取。
    pub fn arm(&self) {
        let mut inner = self.lock();
        inner.cancel_pending();
        inner.generation = inner.generation.wrapping_add(1);
        inner.active = true;

        let generation = inner.generation;
        let delay = self.reset_delay;
        let shared = Arc::clone(&self.inner);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                inner.pending_reset = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let mut inner = shared.lock().unwrap_or_else(|p| p.into_inner());
                    if inner.generation == generation {
                        inner.active = false;
                        inner.pending_reset = None;
                        log::debug!("⏲️ 复制反馈已复位");
                    }
                }));
            }
            Err(_) => {
                log::warn!("当前不在 tokio 运行时内，复制反馈不会自动复位");
            }
        }
    }

    /// 立即复位并取消挂起的复位任务。
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.cancel_pending();
        inner.generation = inner.generation.wrapping_add(1);
        inner.active = false;
    }

    pub fn has_pending_reset(&self) -> bool {
        self.lock().pending_reset.is_some()
    }
}
