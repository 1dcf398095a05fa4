//! # 抽取与复制
//!
//! ## 设计思路
//!
//! - `draw`：复位复制反馈，在 `[0, len)` 内均匀抽取下标（有放回），覆盖已选中的码
//! - `copy`：把已选中的码写入剪贴板，成功后置复制反馈并调度复位
//!
//! 空池不做 panic：抽取返回 `SelectError::EmptyPool`，已选中的码清空。
//! 失败一律记日志后以 `Result` 返回，是否展示由调用方决定，不重试。

use rand::Rng;

use crate::error::{ClipboardError, SelectError};
use crate::session::Session;

/// 在 `[0, len)` 内均匀选取下标。`len` 必须大于 0。
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..len)
}

/// 随机抽取一个码。占位条目返回 `Ok(None)`。
pub fn draw(session: &Session) -> Result<Option<String>, SelectError> {
    draw_with_rng(session, &mut rand::thread_rng())
}

pub fn draw_with_rng<R: Rng + ?Sized>(
    session: &Session,
    rng: &mut R,
) -> Result<Option<String>, SelectError> {
    session.feedback().clear();

    let pool = session.pool();
    if pool.is_empty() {
        session.set_selected(None)?;
        log::warn!("码池为空（已加载：{}），无法抽取", session.is_loaded());
        return Err(SelectError::EmptyPool);
    }

    let index = pick_index(pool.len(), rng);
    let code = pool.get(index).cloned().flatten();
    session.set_selected(code.clone())?;

    match &code {
        Some(code) => log::debug!("🎲 抽取下标 {}/{}：{}", index, pool.len(), code),
        None => log::warn!("🎲 抽取下标 {}/{} 为缺失码值的占位行", index, pool.len()),
    }

    Ok(code)
}

/// 将已选中的码复制到剪贴板。
pub async fn copy(session: &Session) -> Result<(), ClipboardError> {
    let Some(code) = session.selected_code() else {
        log::warn!("❌ 复制失败：{}", ClipboardError::NothingSelected);
        return Err(ClipboardError::NothingSelected);
    };

    let sink = session.clipboard();
    let result = tokio::task::spawn_blocking(move || sink.write_text(&code))
        .await
        .map_err(|e| ClipboardError::Join(e.to_string()))
        .and_then(|inner| inner);

    match result {
        Ok(()) => {
            session.feedback().arm();
            log::info!("✅ 已复制到剪贴板");
            Ok(())
        }
        Err(err) => {
            log::warn!("❌ 复制失败：{}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::PickerConfig;
    use crate::pool::CodePool;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::time::Duration;

    fn session_with(codes: &[&str]) -> (Session, Arc<MemoryClipboard>) {
        let clipboard = Arc::new(MemoryClipboard::new());
        let session = Session::new(PickerConfig::default(), clipboard.clone());
        session
            .publish_pool(codes.iter().map(|c| c.to_string()).collect())
            .expect("publish failed");
        (session, clipboard)
    }

    #[test]
    fn pick_index_covers_every_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 5];
        for _ in 0..10_000 {
            let idx = pick_index(5, &mut rng);
            assert!(idx < 5);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn draw_returns_pool_member_and_stores_selection() {
        let (session, _) = session_with(&["ABC123", "XYZ789"]);
        for _ in 0..2 {
            let code = draw(&session).expect("draw failed").expect("placeholder");
            assert!(code == "ABC123" || code == "XYZ789");
            assert_eq!(session.selected_code(), Some(code));
        }
    }

    #[test]
    fn draw_on_unloaded_session_reports_empty_pool() {
        let session = Session::new(PickerConfig::default(), Arc::new(MemoryClipboard::new()));
        assert_eq!(draw(&session), Err(SelectError::EmptyPool));
        assert_eq!(session.selected_code(), None);
    }

    #[test]
    fn draw_on_empty_pool_clears_previous_selection() {
        let (session, _) = session_with(&[]);
        session.set_selected(Some("OLD".to_string())).expect("set");
        assert_eq!(draw(&session), Err(SelectError::EmptyPool));
        assert_eq!(session.selected_code(), None);
    }

    #[test]
    fn draw_on_placeholder_selects_nothing() {
        let session = Session::new(PickerConfig::default(), Arc::new(MemoryClipboard::new()));
        session
            .publish_pool(CodePool::new(vec![None]))
            .expect("publish failed");

        assert_eq!(draw(&session), Ok(None));
        assert_eq!(session.selected_code(), None);
    }

    #[tokio::test]
    async fn copy_without_selection_does_not_touch_clipboard() {
        let (session, clipboard) = session_with(&["A"]);
        let result = copy(&session).await;
        assert!(matches!(result, Err(ClipboardError::NothingSelected)));
        assert_eq!(clipboard.write_count(), 0);
        assert!(!session.is_copy_feedback_active());
    }

    #[tokio::test(start_paused = true)]
    async fn copy_sets_feedback_and_draw_resets_it() {
        let (session, clipboard) = session_with(&["ONLY"]);
        draw(&session).expect("draw failed");
        copy(&session).await.expect("copy failed");

        assert_eq!(clipboard.contents().as_deref(), Some("ONLY"));
        assert!(session.is_copy_feedback_active());

        draw(&session).expect("draw failed");
        assert!(!session.is_copy_feedback_active());
        assert!(!session.feedback().has_pending_reset());

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(!session.is_copy_feedback_active());
    }

    #[tokio::test]
    async fn denied_copy_leaves_feedback_unchanged() {
        let (session, clipboard) = session_with(&["ONLY"]);
        clipboard.set_denied(true);
        draw(&session).expect("draw failed");

        let result = copy(&session).await;

        assert!(matches!(result, Err(ClipboardError::Platform(_))));
        assert!(!session.is_copy_feedback_active());
    }
}
