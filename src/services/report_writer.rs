//! 报告写入服务 - 业务能力层
//!
//! 只负责把评分结果写成 CSV 文件和 HTML 表格，不关心评分流程

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult, ReportError};
use crate::models::GradeResult;

/// 报告列名
pub const REPORT_COLUMNS: [&str; 5] = ["RegNo", "Section", "Submission", "Feedback", "Grade"];

/// 报告写入服务
///
/// 职责：
/// - 把评分结果写入固定路径的 CSV（每次覆盖）
/// - 读取已生成的报告供下载
/// - 渲染 HTML 结果表格
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    /// 使用指定报告路径创建
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 覆盖写入 CSV 报告
    ///
    /// # 参数
    /// - `results`: 评分结果（按提取顺序）
    pub async fn write(&self, results: &[GradeResult]) -> AppResult<()> {
        let path_display = self.report_path.display().to_string();

        if let Some(parent) = self.report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::report_write_failed(&path_display, e))?;
            }
        }

        fs::write(&self.report_path, to_csv(results))
            .await
            .map_err(|e| AppError::report_write_failed(&path_display, e))?;

        debug!("报告已写入 {}，共 {} 行", path_display, results.len());
        Ok(())
    }

    /// 读取已生成的报告
    ///
    /// 报告尚未生成时返回 `ReportError::NotFound`
    pub async fn read(&self) -> AppResult<Vec<u8>> {
        match fs::read(&self.report_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::Report(ReportError::NotFound {
                    path: self.report_path.display().to_string(),
                }))
            }
            Err(e) => Err(AppError::report_write_failed(
                self.report_path.display().to_string(),
                e,
            )),
        }
    }

    /// 下载时使用的文件名
    pub fn file_name(&self) -> String {
        self.report_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "graded_feedback.csv".to_string())
    }
}

/// 把评分结果序列化为 CSV（含表头）
pub fn to_csv(results: &[GradeResult]) -> String {
    let mut csv = REPORT_COLUMNS.join(",");
    csv.push('\n');
    for result in results {
        let score = result.score.to_string();
        let row = [
            result.identifier.as_str(),
            result.section.as_str(),
            result.answer.as_str(),
            result.feedback.as_str(),
            score.as_str(),
        ];
        let fields: Vec<Cow<'_, str>> = row.iter().map(|field| csv_field(field)).collect();
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    csv
}

/// CSV 字段转义：包含逗号、引号或换行时加引号，内部引号加倍
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// 渲染 HTML 结果表格，所有单元格内容都会转义
pub fn to_html_table(results: &[GradeResult]) -> String {
    let mut html = String::from("<table class=\"table table-striped\">\n<thead>\n<tr style=\"text-align: left;\">");
    for column in REPORT_COLUMNS {
        html.push_str(&format!("<th>{}</th>", column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for result in results {
        html.push_str("<tr>");
        let score = result.score.to_string();
        for cell in [
            result.identifier.as_str(),
            result.section.as_str(),
            result.answer.as_str(),
            result.feedback.as_str(),
            score.as_str(),
        ] {
            html.push_str(&format!("<td>{}</td>", html_escape::encode_text(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}
