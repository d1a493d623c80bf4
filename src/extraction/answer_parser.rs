//! 答案解析
//!
//! 从 PDF 拼接文本中找出重复出现的 (学号, 班级, 答案) 三元组。
//!
//! 字段必须按 学号 → 班级 → 答案 的顺序出现，标签忽略大小写，标签后可带 `:` 或 `-`。
//! 答案一直延伸到下一个学号标签或文本结尾。
//!
//! 学号与班级标签之间的间隔不受下一个学号标签限制：
//! 某个块缺少班级时，会借用下一个块的班级（已知的脆弱点，保持原样）。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{AnswerSheet, StudentRecord};

/// 学号标签：RegNo / Reg No / Reg. No / RegNo.
const ID_LABEL: &str = r"Reg\.?\s?No\.?";

/// 学号 → 班级 → 答案标签，匹配结束位置即答案开始位置
static RECORD_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is){ID_LABEL}\s*[:\-]?\s*(\w+).*?Section\s*[:\-]?\s*([\w\-]+).*?Answer\s*[:\-]?\s*"
    ))
    .expect("record head pattern is valid")
});

/// 下一个学号标签，用于确定答案结束位置
static NEXT_ID_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){ID_LABEL}")).expect("id label pattern is valid")
});

/// 从文本中解析答题记录
///
/// # 参数
/// - `raw_text`: 从 PDF 中提取出的文本
///
/// # 返回
/// 返回 学号 → 记录 的映射；重复学号以后出现的为准；没有匹配时返回空映射
pub fn extract_answers(raw_text: &str) -> AnswerSheet {
    let mut sheet = AnswerSheet::new();
    let mut cursor = 0;

    while let Some(caps) = RECORD_HEAD.captures_at(raw_text, cursor) {
        let Some(head) = caps.get(0) else { break };
        let answer_start = head.end();
        let answer_end = NEXT_ID_LABEL
            .find_at(raw_text, answer_start)
            .map(|m| m.start())
            .unwrap_or(raw_text.len());

        let record = StudentRecord::new(
            caps[1].trim(),
            caps[2].trim(),
            raw_text[answer_start..answer_end].trim(),
        );

        if let Some(previous) = sheet.insert(record) {
            debug!("学号 {} 重复出现，使用后出现的记录", previous.identifier);
        }

        // 防止空匹配导致死循环
        cursor = answer_end.max(head.start() + 1);
        if cursor >= raw_text.len() {
            break;
        }
    }

    debug!("共解析出 {} 条答题记录", sheet.len());
    sheet
}
