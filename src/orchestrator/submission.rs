//! 单次评分请求处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **保存上传**：清理文件名后保存到上传目录（保留供之后查看）
//! 2. **提取答案**：PDF → 文本 → 答题记录
//! 3. **班级评分**：委托 `section_grader`
//! 4. **写入报告**：覆盖写入 CSV，渲染 HTML 表格
//!
//! 同一时间只处理一个请求，后到的请求等待前一个完成

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ExtractionError, InputError, ReportError};
use crate::extraction::extract_answers_from_pdf;
use crate::models::GradeResult;
use crate::orchestrator::section_grader::{grade_section, SectionOutcome};
use crate::services::report_writer::to_html_table;
use crate::services::{AnswerGrader, ReportWriter};
use crate::utils::logging::{append_log_line, log_request_complete, log_request_start};

/// 没有可评分答案时的提示
pub const NO_ANSWERS_WARNING: &str = "No answers found for the chosen section.";

/// 一次已校验的评分请求
#[derive(Debug, Clone)]
pub struct Submission {
    question: String,
    section: String,
    file_name: String,
    pdf_bytes: Vec<u8>,
}

impl Submission {
    /// 校验并创建评分请求
    ///
    /// 题目和班级去除首尾空白后不能为空，文件名必须以 `.pdf` 结尾（忽略大小写）
    pub fn new(
        question: &str,
        section: &str,
        file_name: Option<&str>,
        pdf_bytes: Vec<u8>,
    ) -> Result<Self, InputError> {
        let question = question.trim();
        let section = section.trim();

        if question.is_empty() {
            return Err(InputError::MissingQuestion);
        }
        if section.is_empty() {
            return Err(InputError::MissingSection);
        }
        let file_name = file_name
            .map(str::trim)
            .filter(|name| name.to_lowercase().ends_with(".pdf"))
            .ok_or(InputError::InvalidPdf)?;

        Ok(Self {
            question: question.to_string(),
            section: section.to_string(),
            file_name: file_name.to_string(),
            pdf_bytes,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// 评分请求的处理结果
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// 有评分结果
    Graded {
        results: Vec<GradeResult>,
        table_html: String,
        warnings: Vec<String>,
        /// 本次结果是否已写入 CSV，可供下载
        report_saved: bool,
    },
    /// 没有可评分的答案
    NoAnswers { warnings: Vec<String> },
}

impl SubmissionOutcome {
    pub fn warnings(&self) -> &[String] {
        match self {
            SubmissionOutcome::Graded { warnings, .. } => warnings,
            SubmissionOutcome::NoAnswers { warnings } => warnings,
        }
    }
}

/// 评分流水线
///
/// 持有评分器和报告写入服务，逐个处理评分请求
pub struct GradingPipeline<G> {
    grader: G,
    report_writer: ReportWriter,
    upload_folder: PathBuf,
    log_file: Option<String>,
    /// 保证同一时间只有一个请求在评分
    in_flight: Mutex<()>,
    /// 本进程内最近一次报告写入是否成功
    report_ready: AtomicBool,
}

impl<G: AnswerGrader + Sync> GradingPipeline<G> {
    /// 创建新的评分流水线
    pub fn new(config: &Config, grader: G) -> Self {
        Self {
            grader,
            report_writer: ReportWriter::new(&config.report_path),
            upload_folder: PathBuf::from(&config.upload_folder),
            log_file: Some(config.output_log_file.clone()),
            in_flight: Mutex::new(()),
            report_ready: AtomicBool::new(false),
        }
    }

    /// 不写评分日志文件
    pub fn without_log_file(mut self) -> Self {
        self.log_file = None;
        self
    }

    pub fn report_writer(&self) -> &ReportWriter {
        &self.report_writer
    }

    /// 本进程内是否已有可下载的报告
    pub fn report_ready(&self) -> bool {
        self.report_ready.load(Ordering::SeqCst)
    }

    /// 读取可下载的报告
    ///
    /// 只返回本进程写入成功的报告；之前进程留下的文件或写入失败后的残留文件
    /// 都视为不存在，返回 `ReportError::NotFound`
    pub async fn read_report(&self) -> AppResult<Vec<u8>> {
        let _guard = self.in_flight.lock().await;
        if !self.report_ready() {
            return Err(AppError::Report(ReportError::NotFound {
                path: self.report_writer.path().display().to_string(),
            }));
        }
        self.report_writer.read().await
    }

    /// 处理一次评分请求
    ///
    /// # 参数
    /// - `submission`: 已校验的评分请求
    ///
    /// # 返回
    /// 返回评分结果；PDF 无法打开或上传无法保存时返回错误
    pub async fn process(&self, submission: &Submission) -> AppResult<SubmissionOutcome> {
        let _guard = self.in_flight.lock().await;

        log_request_start(
            submission.question(),
            submission.section(),
            submission.file_name(),
        );

        let saved_path = self.save_upload(submission).await?;
        info!("💾 上传文件已保存: {}", saved_path.display());

        let sheet = extract_answers_from_pdf(&submission.pdf_bytes)?;
        info!("📄 提取出 {} 条答题记录", sheet.len());

        let outcome = grade_section(
            &self.grader,
            submission.question(),
            submission.section(),
            &sheet,
        )
        .await;

        let mut warnings: Vec<String> = outcome.warnings().iter().map(|w| w.to_string()).collect();

        let outcome = match outcome {
            SectionOutcome::Graded(report) => {
                let report_saved = match self.report_writer.write(&report.results).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("⚠️ 报告写入失败: {}", e);
                        warnings.push("The report could not be saved for download.".to_string());
                        false
                    }
                };
                self.report_ready.store(report_saved, Ordering::SeqCst);
                let table_html = to_html_table(&report.results);
                SubmissionOutcome::Graded {
                    results: report.results,
                    table_html,
                    warnings,
                    report_saved,
                }
            }
            SectionOutcome::NoAnswers { .. } => {
                warn!("⚠️ 班级 {} 没有可评分的答案", submission.section());
                warnings.push(NO_ANSWERS_WARNING.to_string());
                SubmissionOutcome::NoAnswers { warnings }
            }
        };

        let graded = match &outcome {
            SubmissionOutcome::Graded { results, .. } => results.len(),
            SubmissionOutcome::NoAnswers { .. } => 0,
        };
        log_request_complete(graded, outcome.warnings().len(), sheet.len());
        self.append_request_log(submission, graded, outcome.warnings().len());

        Ok(outcome)
    }

    /// 保存上传的 PDF
    async fn save_upload(&self, submission: &Submission) -> AppResult<PathBuf> {
        let path = self.upload_folder.join(secure_filename(submission.file_name()));
        let to_error = |source| {
            AppError::Extraction(ExtractionError::UploadSaveFailed {
                path: path.display().to_string(),
                source,
            })
        };

        fs::create_dir_all(&self.upload_folder)
            .await
            .map_err(to_error)?;
        fs::write(&path, &submission.pdf_bytes)
            .await
            .map_err(to_error)?;
        Ok(path)
    }

    fn append_request_log(&self, submission: &Submission, graded: usize, warnings: usize) {
        let Some(log_file) = &self.log_file else {
            return;
        };
        let line = format!(
            "file={} section={} graded={} warnings={}",
            submission.file_name(),
            submission.section(),
            graded,
            warnings
        );
        if let Err(e) = append_log_line(log_file, &line) {
            warn!("⚠️ 写入评分日志失败: {}", e);
        }
    }
}

/// 清理上传文件名，只保留 ASCII 字母数字和 `.` `-` `_`
///
/// 路径分隔符会被替换，开头的 `.` 会被去掉；清理后为空时使用 `upload.pdf`
pub fn secure_filename(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();

    if cleaned.is_empty() {
        "upload.pdf".to_string()
    } else {
        cleaned
    }
}
