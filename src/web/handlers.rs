//! HTTP 请求处理
//!
//! - `GET /` 表单页面
//! - `POST /grade` 上传并评分
//! - `GET /download` 下载 CSV 报告
//!
//! 所有面向用户的失败都重定向回表单页面并显示提示，不返回服务器错误

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, warn};

use crate::error::{AppError, ExtractionError, InputError, ReportError};
use crate::orchestrator::{Submission, SubmissionOutcome};
use crate::services::AnswerGrader;
use crate::web::page::{notice_url, render_index, split_notices, ResultsView};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    notice: Option<String>,
}

/// 表单原始字段
#[derive(Debug, Default)]
struct GradeForm {
    question: String,
    section: String,
    file_name: Option<String>,
    pdf_bytes: Vec<u8>,
}

/// 首页
pub async fn index(Query(params): Query<IndexParams>) -> Html<String> {
    Html(render_index(&split_notices(params.notice.as_deref()), None))
}

/// 上传 PDF 并评分
pub async fn grade<G>(State(state): State<AppState<G>>, multipart: Multipart) -> Response
where
    G: AnswerGrader + Send + Sync + 'static,
{
    let submission = match read_form(multipart).await.and_then(|form| {
        Submission::new(
            &form.question,
            &form.section,
            form.file_name.as_deref(),
            form.pdf_bytes,
        )
    }) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("⚠️ 表单校验失败: {}", e);
            return redirect_with(vec![e.to_string()]);
        }
    };

    match state.pipeline.process(&submission).await {
        Ok(SubmissionOutcome::Graded {
            table_html,
            warnings,
            report_saved,
            ..
        }) => {
            let view = ResultsView {
                table_html: &table_html,
                downloadable: report_saved,
            };
            Html(render_index(&warnings, Some(view))).into_response()
        }
        Ok(SubmissionOutcome::NoAnswers { warnings }) => redirect_with(warnings),
        Err(e) => {
            if e.is_user_facing() {
                warn!("⚠️ 评分请求失败: {}", e);
            } else {
                error!("评分请求失败: {}", e);
            }
            redirect_with(vec![user_message(&e)])
        }
    }
}

/// 下载 CSV 报告
pub async fn download<G>(State(state): State<AppState<G>>) -> Response
where
    G: AnswerGrader + Send + Sync + 'static,
{
    match state.pipeline.read_report().await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        state.pipeline.report_writer().file_name()
                    ),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!("⚠️ 下载失败: {}", e);
            redirect_with(vec![user_message(&e)])
        }
    }
}

/// 读取 multipart 表单
async fn read_form(mut multipart: Multipart) -> Result<GradeForm, InputError> {
    let malformed = |e: axum::extract::multipart::MultipartError| InputError::MalformedForm(e.body_text());
    let mut form = GradeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("question") => form.question = field.text().await.map_err(malformed)?,
            Some("section") => form.section = field.text().await.map_err(malformed)?,
            Some("pdf") => {
                form.file_name = field.file_name().map(str::to_string);
                form.pdf_bytes = field.bytes().await.map_err(malformed)?.to_vec();
            }
            _ => {}
        }
    }

    Ok(form)
}

/// 错误对应的用户提示
fn user_message(error: &AppError) -> String {
    match error {
        AppError::Input(e) => e.to_string(),
        AppError::Extraction(ExtractionError::UnreadableDocument { .. }) => {
            "Could not read text from the uploaded PDF.".to_string()
        }
        AppError::Extraction(ExtractionError::UploadSaveFailed { .. }) => {
            "The uploaded file could not be saved.".to_string()
        }
        AppError::Report(ReportError::NotFound { .. }) => {
            "No graded report found. Please grade first.".to_string()
        }
        _ => "Something went wrong while grading. Please try again.".to_string(),
    }
}

fn redirect_with(notices: Vec<String>) -> Response {
    Redirect::to(&notice_url(&notices)).into_response()
}
