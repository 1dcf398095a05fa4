//! 剪贴板写入模块
//!
//! # 设计思路
//!
//! 以 `ClipboardSink` trait 隔离平台剪贴板：
//! - `SystemClipboard`：通过 `arboard` 写入系统剪贴板
//! - `MemoryClipboard`：内存实现，供测试与无图形环境（`--no-clipboard`）使用
//!
//! # 实现思路
//!
//! trait 方法为同步阻塞调用，由上层放到 `spawn_blocking` 中执行，
//! 避免阻塞 async 运行时。写入失败不重试。
//!
//! X11/Wayland 下剪贴板内容由写入进程持有，`arboard::Clipboard` 一旦被 drop
//! 所有权就交出去了。因此 `SystemClipboard` 在独立线程中长期持有同一个
//! `arboard::Clipboard`，所有写入都投递给该线程；进程即将退出的场景（`--once`）
//! 可配置接管等待时长，写入后阻塞到其他程序接管剪贴板或超时为止。

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::ClipboardError;

/// 文本剪贴板写入端。
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// 持有线程内的剪贴板句柄。
trait HeldClipboard {
    fn put_text(&mut self, text: &str, handover: Option<Duration>) -> Result<(), ClipboardError>;
}

impl HeldClipboard for arboard::Clipboard {
    fn put_text(&mut self, text: &str, handover: Option<Duration>) -> Result<(), ClipboardError> {
        let result = match handover {
            Some(max_wait) => {
                log::info!(
                    "⏳ 保持剪贴板所有权，等待其他程序接管（最多 {}ms）",
                    max_wait.as_millis()
                );
                set_with_handover(self, text, max_wait)
            }
            None => self.set_text(text.to_string()),
        };
        result.map_err(|e| ClipboardError::Platform(e.to_string()))
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_with_handover(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    max_wait: Duration,
) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .wait_until(std::time::Instant::now() + max_wait)
        .text(text.to_string())
}

/// 其他平台剪贴板内容由系统持有，进程退出后仍保留。
#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_with_handover(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _max_wait: Duration,
) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}

fn open_arboard() -> Result<arboard::Clipboard, ClipboardError> {
    arboard::Clipboard::new().map_err(|e| ClipboardError::Platform(e.to_string()))
}

#[derive(Debug)]
struct WriteRequest {
    text: String,
    reply: mpsc::Sender<Result<(), ClipboardError>>,
}

/// 持有线程主循环：按需打开句柄并一直复用，写入失败则丢弃句柄、下次重开。
fn run_owner<C, F>(open: F, handover: Option<Duration>, requests: mpsc::Receiver<WriteRequest>)
where
    C: HeldClipboard,
    F: Fn() -> Result<C, ClipboardError>,
{
    let mut held: Option<C> = None;
    for request in requests {
        let result = write_held(&mut held, &open, &request.text, handover);
        let _ = request.reply.send(result);
    }
    log::debug!("剪贴板持有线程退出");
}

fn write_held<C, F>(
    held: &mut Option<C>,
    open: &F,
    text: &str,
    handover: Option<Duration>,
) -> Result<(), ClipboardError>
where
    C: HeldClipboard,
    F: Fn() -> Result<C, ClipboardError>,
{
    if held.is_none() {
        *held = Some(open()?);
    }
    let clipboard = held
        .as_mut()
        .ok_or_else(|| ClipboardError::Platform("剪贴板句柄未初始化".to_string()))?;

    let result = clipboard.put_text(text, handover);
    if result.is_err() {
        *held = None;
    }
    result
}

/// 系统剪贴板（arboard），由独立线程长期持有。
#[derive(Debug)]
pub struct SystemClipboard {
    requests: mpsc::Sender<WriteRequest>,
}

impl SystemClipboard {
    /// 常驻进程使用：句柄随进程存活，写入立即返回。
    pub fn new() -> Self {
        Self::with_handover(None)
    }

    /// `handover` 为 `Some` 时，每次写入阻塞到其他程序接管剪贴板或超时（仅 X11/Wayland 生效）。
    pub fn with_handover(handover: Option<Duration>) -> Self {
        Self::spawn(open_arboard, handover)
    }

    fn spawn<C, F>(open: F, handover: Option<Duration>) -> Self
    where
        C: HeldClipboard,
        F: Fn() -> Result<C, ClipboardError> + Send + 'static,
    {
        let (requests, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("clipboard-owner".to_string())
            .spawn(move || run_owner(open, handover, receiver));
        if let Err(err) = spawned {
            log::error!("启动剪贴板持有线程失败: {}", err);
        }
        Self { requests }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let (reply, response) = mpsc::channel();
        self.requests
            .send(WriteRequest {
                text: text.to_string(),
                reply,
            })
            .map_err(|_| ClipboardError::Join("剪贴板持有线程已退出".to_string()))?;

        response
            .recv()
            .map_err(|_| ClipboardError::Join("剪贴板持有线程已退出".to_string()))??;
        log::debug!("📋 已写入系统剪贴板（{} 字符）", text.chars().count());
        Ok(())
    }
}

/// 内存剪贴板。
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    writes: AtomicUsize,
    denied: AtomicBool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟平台拒绝写入（如权限不足）。
    pub fn set_denied(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|p| p.into_inner().clone())
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.denied.load(Ordering::SeqCst) {
            return Err(ClipboardError::Platform("写入被拒绝".to_string()));
        }
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| ClipboardError::Platform("内存剪贴板锁已中毒".to_string()))?;
        *contents = Some(text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
