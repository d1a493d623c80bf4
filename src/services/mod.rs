pub mod heuristic_grader;
pub mod llm_service;
pub mod model_grader;
pub mod report_writer;

pub use heuristic_grader::heuristic_grade;
pub use llm_service::{LlmService, TextGenerator};
pub use model_grader::{AnswerGrader, FallbackReason, ModelGrader, RemoteGrade};
pub use report_writer::ReportWriter;
