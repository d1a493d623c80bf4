use answer_grader::error::{AppError, ReportError};
use answer_grader::services::TextGenerator;
use answer_grader::{
    heuristic_grade, GradingMode, GradingPipeline, ModelGrader, Submission,
    SubmissionOutcome,
};
use std::future::Future;
use std::path::Path;

mod common;
use common::{answer_sheet_pdf, test_config};

/// 固定回复的生成器
struct FixedReply(&'static str);

impl TextGenerator for FixedReply {
    fn generate(&self, _prompt: &str) -> impl Future<Output = anyhow::Result<String>> + Send {
        let reply = self.0.to_string();
        async move { Ok(reply) }
    }
}

/// 必然失败的生成器
struct Offline;

impl TextGenerator for Offline {
    fn generate(&self, _prompt: &str) -> impl Future<Output = anyhow::Result<String>> + Send {
        async { Err(anyhow::anyhow!("401 Unauthorized")) }
    }
}

#[tokio::test]
async fn test_heuristic_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only());

    let submission =
        Submission::new("What is TCP?", "CS1", Some("answers.pdf"), answer_sheet_pdf()).unwrap();
    let outcome = pipeline.process(&submission).await.unwrap();

    let SubmissionOutcome::Graded {
        results,
        table_html,
        warnings,
        report_saved,
    } = outcome
    else {
        panic!("expected graded outcome");
    };

    assert!(warnings.is_empty());
    assert!(report_saved);
    assert!(pipeline.report_ready());
    let ids: Vec<&str> = results.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, vec!["R1", "R2"]);

    assert_eq!(results[0].score.value(), 1.0);
    assert!(results[0].feedback.contains("No answer detected"));
    assert_eq!(
        results[1],
        answer_grader::GradeResult {
            identifier: "R2".to_string(),
            section: "cs1".to_string(),
            answer: "TCP is a reliable transport protocol".to_string(),
            feedback: heuristic_grade("What is TCP?", "TCP is a reliable transport protocol")
                .feedback,
            score: heuristic_grade("What is TCP?", "TCP is a reliable transport protocol").score,
        }
    );
    assert!(table_html.contains("<td>R2</td>"));

    let csv = std::fs::read_to_string(&config.report_path).unwrap();
    assert!(csv.starts_with("RegNo,Section,Submission,Feedback,Grade\n"));
    assert!(csv.contains("R1,CS1,,"));
    assert!(!csv.contains("R3"));

    assert!(dir.path().join("uploads").join("answers.pdf").exists());
    let log = std::fs::read_to_string(&config.output_log_file).unwrap();
    assert!(log.contains("section=CS1 graded=2"));
}

#[tokio::test]
async fn test_remote_scores_are_used_when_available() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let reply = "Score: 8.5/10\n**Strengths:**\n- Accurate\n**Improvements:**\n- None";
    let grader = ModelGrader::new(GradingMode::Remote, FixedReply(reply));
    let pipeline = GradingPipeline::new(&config, grader).without_log_file();

    let submission =
        Submission::new("What is TCP?", "cs2", Some("answers.pdf"), answer_sheet_pdf()).unwrap();
    let outcome = pipeline.process(&submission).await.unwrap();

    let SubmissionOutcome::Graded { results, .. } = outcome else {
        panic!("expected graded outcome");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].identifier, "R3");
    assert_eq!(results[0].score.value(), 8.5);
    assert_eq!(results[0].feedback, reply);
    assert!(!Path::new(&config.output_log_file).exists());
}

#[tokio::test]
async fn test_unknown_section_reports_no_answers_and_keeps_old_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only());

    let submission =
        Submission::new("What is TCP?", "CS9", Some("answers.pdf"), answer_sheet_pdf()).unwrap();
    let outcome = pipeline.process(&submission).await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::NoAnswers { .. }));
    assert_eq!(
        outcome.warnings(),
        ["No answers found for the chosen section.".to_string()]
    );
    assert!(!Path::new(&config.report_path).exists());
}

#[tokio::test]
async fn test_unreadable_pdf_is_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only()).without_log_file();

    let submission =
        Submission::new("What is TCP?", "CS1", Some("broken.pdf"), b"%PDF-garbage".to_vec())
            .unwrap();
    let result = pipeline.process(&submission).await;

    assert!(matches!(result, Err(AppError::Extraction(_))));
    assert!(result.unwrap_err().is_user_facing());
}

#[tokio::test]
async fn test_report_from_earlier_process_is_not_served() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(&config.report_path, "RegNo,Section\nOLD,from-previous-process\n").unwrap();

    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only()).without_log_file();
    assert!(!pipeline.report_ready());

    let result = pipeline.read_report().await;
    assert!(matches!(
        result,
        Err(AppError::Report(ReportError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_read_report_after_successful_grade() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(&config.report_path, "RegNo,Section\nOLD,from-previous-process\n").unwrap();
    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only()).without_log_file();

    let submission =
        Submission::new("What is TCP?", "CS2", Some("answers.pdf"), answer_sheet_pdf()).unwrap();
    pipeline.process(&submission).await.unwrap();

    let csv = String::from_utf8(pipeline.read_report().await.unwrap()).unwrap();
    assert!(csv.contains("R3,CS2,"));
    assert!(!csv.contains("OLD"));
}

#[tokio::test]
async fn test_failed_report_write_is_not_downloadable() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    // 报告路径是目录，写入必然失败
    let blocked = dir.path().join("report_dir");
    std::fs::create_dir_all(&blocked).unwrap();
    config.report_path = blocked.display().to_string();
    let pipeline = GradingPipeline::new(&config, ModelGrader::heuristic_only()).without_log_file();

    let submission =
        Submission::new("What is TCP?", "CS1", Some("answers.pdf"), answer_sheet_pdf()).unwrap();
    let outcome = pipeline.process(&submission).await.unwrap();

    let SubmissionOutcome::Graded {
        results,
        warnings,
        report_saved,
        ..
    } = outcome
    else {
        panic!("expected graded outcome");
    };
    assert_eq!(results.len(), 2);
    assert!(!report_saved);
    assert_eq!(
        warnings,
        vec!["The report could not be saved for download.".to_string()]
    );
    assert!(!pipeline.report_ready());
    assert!(matches!(
        pipeline.read_report().await,
        Err(AppError::Report(ReportError::NotFound { .. }))
    ));
}

#[test]
fn test_offline_remote_grader_matches_heuristic() {
    let grader = ModelGrader::new(GradingMode::Remote, Offline);
    for answer in ["", "TCP", "Transmission Control Protocol provides ordered delivery"] {
        let grade = tokio_test::block_on(grader.grade("What is TCP?", answer));
        assert_eq!(grade, heuristic_grade("What is TCP?", answer));
    }
}
