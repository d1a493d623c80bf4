//! 班级评分 - 编排层
//!
//! 按班级筛选答题记录（忽略大小写），逐条调用评分器，汇总结果。
//! 单条记录评分失败只记录警告，不影响其余记录。

use std::fmt;
use tracing::{debug, info, warn};

use crate::models::{AnswerSheet, GradeResult};
use crate::services::AnswerGrader;
use crate::utils::logging::truncate_text;

/// 单条记录评分失败的警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWarning {
    pub identifier: String,
    pub message: String,
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to grade RegNo {}: {}", self.identifier, self.message)
    }
}

/// 一个班级的评分报告
#[derive(Debug, Clone, Default)]
pub struct SectionReport {
    /// 评分结果，按提取顺序
    pub results: Vec<GradeResult>,
    /// 评分失败的记录
    pub warnings: Vec<RecordWarning>,
}

/// 班级评分结果
#[derive(Debug, Clone)]
pub enum SectionOutcome {
    /// 至少一条记录评分成功
    Graded(SectionReport),
    /// 没有匹配的记录，或全部评分失败（不是错误）
    NoAnswers { warnings: Vec<RecordWarning> },
}

impl SectionOutcome {
    pub fn warnings(&self) -> &[RecordWarning] {
        match self {
            SectionOutcome::Graded(report) => &report.warnings,
            SectionOutcome::NoAnswers { warnings } => warnings,
        }
    }
}

/// 对指定班级的所有答案评分
///
/// # 参数
/// - `grader`: 评分器
/// - `question`: 题目
/// - `section`: 班级（忽略大小写匹配）
/// - `sheet`: 提取出的答题记录
///
/// # 返回
/// 有结果时返回 `Graded`，否则返回 `NoAnswers`
pub async fn grade_section<G: AnswerGrader>(
    grader: &G,
    question: &str,
    section: &str,
    sheet: &AnswerSheet,
) -> SectionOutcome {
    let mut report = SectionReport::default();
    let selected: Vec<_> = sheet.iter().filter(|r| r.in_section(section)).collect();

    info!(
        "👥 班级 {} 匹配 {} 条记录（共 {} 条）",
        section,
        selected.len(),
        sheet.len()
    );

    for (index, record) in selected.iter().enumerate() {
        debug!(
            "[{}/{}] 学号 {} 答案: {}",
            index + 1,
            selected.len(),
            record.identifier,
            truncate_text(&record.answer, 60)
        );

        match grader.grade_answer(question, &record.answer).await {
            Ok(grade) => {
                info!("✓ 学号 {} 得分 {}", record.identifier, grade.score);
                report.results.push(GradeResult::from_record(record, grade));
            }
            Err(e) => {
                warn!("⚠️ 学号 {} 评分失败，跳过: {:#}", record.identifier, e);
                report.warnings.push(RecordWarning {
                    identifier: record.identifier.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if report.results.is_empty() {
        SectionOutcome::NoAnswers {
            warnings: report.warnings,
        }
    } else {
        SectionOutcome::Graded(report)
    }
}
