//! 终端展示模块
//!
//! 只负责把会话状态格式化为文本，不做任何状态修改。

use crate::error::ClipboardError;
use crate::session::Session;

pub const TITLE: &str = "Promo Code Generator";
pub const COPY_LABEL: &str = "Copy Code";
pub const COPIED_LABEL: &str = "Copied!";

pub fn copy_label(feedback_active: bool) -> &'static str {
    if feedback_active { COPIED_LABEL } else { COPY_LABEL }
}

/// 复制操作后给用户的提示：成功显示按钮标签，失败显示错误原因。
pub fn copy_notice(result: &Result<(), ClipboardError>, feedback_active: bool) -> String {
    match result {
        Ok(()) => format!("  [{}]", copy_label(feedback_active)),
        Err(ClipboardError::NothingSelected) => {
            format!("{}，请先输入 g 生成", ClipboardError::NothingSelected)
        }
        Err(err) => format!("{}", err),
    }
}

/// 渲染当前选中的码、复制按钮状态与兑换步骤。
///
/// 未选中任何码时返回 `None`（对应原页面不显示码区域）。
pub fn render_selection(session: &Session) -> Option<String> {
    let code = session.selected_code()?;
    let config = session.config();

    let mut out = String::new();
    out.push_str(&format!("  ┌{}┐\n", "─".repeat(code.chars().count() + 4)));
    out.push_str(&format!("  │  {}  │\n", code));
    out.push_str(&format!("  └{}┘\n", "─".repeat(code.chars().count() + 4)));
    out.push_str(&format!("  [{}]\n", copy_label(session.is_copy_feedback_active())));

    if !config.redeem_steps.is_empty() {
        out.push_str("\nHow to Redeem Your Code\n");
        for (idx, step) in config.redeem_steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", idx + 1, step));
        }
    }

    if let Some(url) = &config.store_url {
        out.push_str(&format!("\nGet the app: {}\n", url));
    }

    Some(out)
}

pub fn help_text() -> &'static str {
    "命令：g 生成  c 复制  s 查看状态  h 帮助  q 退出"
}
