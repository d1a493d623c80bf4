//! LLM 评分 - 业务能力层
//!
//! 远程评分成功且能解析出分数时使用 LLM 结果，否则一律回退到启发式评分。
//! 调用方永远看不到远程调用的失败。
//!
//! LLM 分数保留小数精度（例如 7.5），启发式分数总是整数，两者不做统一。

use anyhow::Result;
use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::GradingMode;
use crate::models::{Grade, Score};
use crate::services::heuristic_grader::heuristic_grade;
use crate::services::llm_service::{LlmService, TextGenerator};
use crate::utils::logging::truncate_text;

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:score|grade)\s*:?\s*([0-9]+(?:\.[0-9]+)?)(?:\s*/\s*10)?")
        .expect("score pattern is valid")
});

/// 评分能力
///
/// 编排层只依赖这个 trait；单条记录评分失败时由编排层跳过并记录警告
pub trait AnswerGrader {
    fn grade_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> impl Future<Output = Result<Grade>> + Send;
}

/// 回退到启发式评分的原因
#[derive(Debug)]
pub enum FallbackReason {
    /// 未配置远程评分
    Disabled,
    /// 远程调用失败（网络、鉴权、超时、响应格式等）
    RemoteFailed(anyhow::Error),
    /// 回复中找不到分数
    ScoreNotFound,
}

/// 一次远程评分尝试的结果
#[derive(Debug)]
pub enum RemoteGrade {
    Graded(Grade),
    Fallback(FallbackReason),
}

/// LLM 评分器
///
/// `generator` 为 `None` 时整个进程只使用启发式评分
pub struct ModelGrader<G = LlmService> {
    generator: Option<G>,
}

impl ModelGrader {
    /// 只使用启发式评分
    pub fn heuristic_only() -> Self {
        Self { generator: None }
    }
}

impl<G: TextGenerator> ModelGrader<G> {
    /// 根据评分模式创建评分器
    pub fn new(mode: GradingMode, generator: G) -> Self {
        match mode {
            GradingMode::Remote => Self::with_generator(generator),
            GradingMode::HeuristicOnly => Self { generator: None },
        }
    }

    /// 使用指定的文本生成器（远程模式）
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn mode(&self) -> GradingMode {
        if self.generator.is_some() {
            GradingMode::Remote
        } else {
            GradingMode::HeuristicOnly
        }
    }

    /// 评分，远程失败时回退到启发式评分
    pub async fn grade(&self, question: &str, answer: &str) -> Grade {
        match self.try_remote(question, answer).await {
            RemoteGrade::Graded(grade) => grade,
            RemoteGrade::Fallback(reason) => {
                match &reason {
                    FallbackReason::Disabled => {}
                    FallbackReason::RemoteFailed(e) => {
                        warn!("⚠️ LLM 评分失败，使用启发式评分: {:#}", e)
                    }
                    FallbackReason::ScoreNotFound => {
                        warn!("⚠️ LLM 回复中没有分数，使用启发式评分")
                    }
                }
                heuristic_grade(question, answer)
            }
        }
    }

    /// 尝试远程评分，不做回退
    pub async fn try_remote(&self, question: &str, answer: &str) -> RemoteGrade {
        let Some(generator) = &self.generator else {
            return RemoteGrade::Fallback(FallbackReason::Disabled);
        };

        let prompt = build_grading_prompt(question, answer);
        let reply = match generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => return RemoteGrade::Fallback(FallbackReason::RemoteFailed(e)),
        };

        debug!("LLM 回复: {}", truncate_text(&reply, 120));

        match parse_score(&reply) {
            Some(score) => RemoteGrade::Graded(Grade::new(score, reply)),
            None => RemoteGrade::Fallback(FallbackReason::ScoreNotFound),
        }
    }
}

impl<G: TextGenerator + Sync> AnswerGrader for ModelGrader<G> {
    fn grade_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> impl Future<Output = Result<Grade>> + Send {
        async move { Ok(self.grade(question, answer).await) }
    }
}

/// 构建评分提示词，题目和答案原样嵌入
pub fn build_grading_prompt(question: &str, answer: &str) -> String {
    format!(
        r#"You are an expert educator. Grade the student's answer based on accuracy, completeness, and clarity.
Provide a score (1-10) and specific feedback.

Question: {question}

Student Answer: {answer}

Please provide:
1. A score from 1-10
2. Feedback in two sections only:
   - **Strengths:** What was done well
   - **Improvements:** What can be improved

Format response as:
Score: X/10
**Strengths:**
- ...
**Improvements:**
- ...
"#
    )
}

/// 从 LLM 回复中提取第一个分数
///
/// 匹配 `score` / `grade` 标签（可带 `:`）后的数字，`/10` 可有可无；
/// 结果截断到 [1, 10]，保留小数
///
/// 只识别 ASCII 数字，其他书写系统的数字不算分数
pub fn parse_score(reply: &str) -> Option<Score> {
    let caps = SCORE_PATTERN.captures(reply)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(Score::clamped(value))
}
