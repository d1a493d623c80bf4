//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `submission` - 单次评分请求处理器
//! - 保存上传文件
//! - 提取答题记录
//! - 写入报告
//! - 保证请求串行处理
//!
//! ### `section_grader` - 班级评分
//! - 按班级筛选记录
//! - 逐条评分，单条失败只产生警告
//!
//! ## 层次关系
//!
//! ```text
//! web (HTTP 表单 / 下载)
//!     ↓
//! submission (处理一次请求)
//!     ↓
//! section_grader (处理 Vec<StudentRecord>)
//!     ↓
//! services (能力层：model_grader / heuristic_grader / report_writer)
//! ```

pub mod section_grader;
pub mod submission;

pub use section_grader::{grade_section, RecordWarning, SectionOutcome, SectionReport};
pub use submission::{GradingPipeline, Submission, SubmissionOutcome};
