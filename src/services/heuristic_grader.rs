//! 启发式评分 - 业务能力层
//!
//! 不依赖任何远程服务，只根据关键词重合度和答案长度打分，总是成功

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{Grade, Score};

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// 答案长度达到该词数即得满分长度分
const FULL_LENGTH_WORDS: usize = 100;
const RELEVANCE_WEIGHT: f64 = 0.6;
const LENGTH_WEIGHT: f64 = 0.4;

/// 空答案的反馈
pub const NO_ANSWER_FEEDBACK: &str =
    "**Improvements:**\n- No answer detected. Please provide a response.";

/// 对单个答案进行启发式评分
///
/// # 参数
/// - `question`: 题目
/// - `answer`: 学生答案
///
/// # 返回
/// 返回整数分数（[1, 10]）和 Strengths / Improvements 两段式反馈
pub fn heuristic_grade(question: &str, answer: &str) -> Grade {
    let answer_words = tokenize(answer);
    let word_count = answer_words.len();

    if word_count == 0 {
        return Grade::new(Score::clamped(1.0), NO_ANSWER_FEEDBACK);
    }

    let question_words: HashSet<String> = tokenize(question).into_iter().collect();
    let answer_set: HashSet<&String> = answer_words.iter().collect();
    let overlap = question_words
        .iter()
        .filter(|w| answer_set.contains(w))
        .count();
    let relevance_ratio = overlap as f64 / question_words.len().max(1) as f64;
    let relevance_score = relevance_ratio * 10.0;

    let length_score = if word_count >= FULL_LENGTH_WORDS {
        10.0
    } else {
        (word_count as f64 / FULL_LENGTH_WORDS as f64) * 10.0
    };

    let final_score = RELEVANCE_WEIGHT * relevance_score + LENGTH_WEIGHT * length_score;
    // 先截断再四舍五入（.5 取偶）
    let score = final_score
        .clamp(Score::MIN, Score::MAX)
        .round_ties_even();

    Grade::new(
        Score::clamped(score),
        build_feedback(relevance_ratio, word_count),
    )
}

/// 小写分词（`\w+`）
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// 根据相关度和长度生成反馈
fn build_feedback(relevance_ratio: f64, word_count: usize) -> String {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    if relevance_ratio > 0.6 {
        strengths.push("Answer is highly relevant to the question.");
    } else if relevance_ratio > 0.3 {
        strengths.push("Answer shows partial relevance to the question.");
    } else {
        improvements.push("Answer lacks clear connection to the question topic.");
    }

    if word_count >= 80 {
        strengths.push("Good explanation length, showing sufficient detail.");
    } else if word_count >= 40 {
        strengths.push("Moderate explanation length.");
        improvements.push("Consider providing more elaboration or examples.");
    } else {
        improvements.push("Answer is too short; lacks depth or reasoning.");
    }

    format!(
        "**Strengths:**\n{}\n\n**Improvements:**\n{}",
        bullet_list(&strengths),
        bullet_list(&improvements)
    )
}

fn bullet_list(items: &[&str]) -> String {
    if items.is_empty() {
        return "- None listed".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
