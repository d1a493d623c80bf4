//! 答案提取模块
//!
//! - `pdf_text` - 从 PDF 字节中逐页提取文本，单页失败直接跳过
//! - `answer_parser` - 从松散格式的文本中解析 (学号, 班级, 答案) 三元组

pub mod answer_parser;
pub mod pdf_text;

pub use answer_parser::extract_answers;
pub use pdf_text::{extract_text_from_pdf, join_page_texts};

use crate::error::AppResult;
use crate::models::AnswerSheet;

/// 从 PDF 字节直接提取答题记录
pub fn extract_answers_from_pdf(pdf_bytes: &[u8]) -> AppResult<AnswerSheet> {
    let text = extract_text_from_pdf(pdf_bytes)?;
    Ok(extract_answers(&text))
}
