//! # 码池模块（pool）
//!
//! ## 设计思路
//!
//! 将“来源识别 → 获取原始文本 → CSV 解析 → 发布到会话”按职责拆分：
//!
//! - `source`：资源位置识别（URL / 文件 / inline）
//! - `loader`：获取文本（reqwest / tokio::fs）与体积限制
//! - `parser`：表头解析与按列提取码值
//!
//! ## 实现思路
//!
//! `CodePool` 构建后只读；发布到会话由 `Session::publish_pool` 负责，
//! 每个会话只成功一次。

mod loader;
mod parser;
mod source;

pub use loader::{load, load_into_session, spawn_startup_load};
pub use parser::parse_codes;
pub use source::PoolSource;

/// 按行序排列的优惠码集合。
///
/// `None` 为占位：对应数据行缺少码值列或值为空。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePool {
    entries: Vec<Option<String>>,
}

impl CodePool {
    pub fn new(entries: Vec<Option<String>>) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// 包含占位在内的条目数。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Option<String>] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Option<String>> {
        self.entries.get(index)
    }

    /// 仅遍历有效码值。
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.as_deref())
    }

    pub fn placeholder_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_none()).count()
    }
}

impl FromIterator<String> for CodePool {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Some).collect())
    }
}
