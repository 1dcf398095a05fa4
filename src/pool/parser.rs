//! # CSV 解析模块
//!
//! ## 设计思路
//!
//! 首行为表头，按列名（精确匹配）提取码值，每个数据行产出一个 `Option<String>`：
//! - 有非空码值：`Some(code)`
//! - 列缺失或值为空：`None` 占位（`MissingCodePolicy::Skip` 时丢弃）
//!
//! ## 实现思路
//!
//! - `flexible(true)`：允许长短不一的行，短行按缺列处理而不是报错。
//! - `Trim::All`：表头与字段去除首尾空白。
//! - 空行由 `csv` 自动跳过，末尾换行不会多出一项。

use csv::{ReaderBuilder, StringRecord, Trim};

use super::CodePool;
use crate::config::MissingCodePolicy;
use crate::error::LoadError;

/// 把 CSV 文本解析为码池。
pub fn parse_codes(
    text: &str,
    column: &str,
    policy: MissingCodePolicy,
) -> Result<CodePool, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column_idx = find_column(&headers, column);
    if column_idx.is_none() {
        log::warn!("⚠️ 表头中未找到列 \"{}\"，所有行将视为缺失码值", column);
    }

    let mut entries = Vec::new();
    let mut missing = 0usize;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::Parse(format!("第 {} 行：{}", row_idx + 2, e)))?;
        let code = column_idx
            .and_then(|idx| record.get(idx))
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        match (code, policy) {
            (Some(code), _) => entries.push(Some(code)),
            (None, MissingCodePolicy::Keep) => {
                missing += 1;
                entries.push(None);
            }
            (None, MissingCodePolicy::Skip) => missing += 1,
        }
    }

    if missing > 0 {
        log::warn!("⚠️ {} 行缺失码值（策略：{:?}）", missing, policy);
    }

    Ok(CodePool::new(entries))
}

fn find_column(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| h == column)
}
