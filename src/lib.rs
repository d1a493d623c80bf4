//! # Answer Grader
//!
//! 从上传的 PDF 中提取学生答案，针对单个题目评分并生成可下载的报告
//!
//! ## 架构设计
//!
//! ### ① 提取层（Extraction）
//! - `extraction/` - PDF 逐页提取文本，解析 (学号, 班级, 答案) 三元组
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个答案
//! - `heuristic_grader` - 本地启发式评分，总是成功
//! - `ModelGrader` - LLM 评分，任何失败都回退到启发式评分
//! - `LlmService` - OpenAI 兼容的 LLM 调用能力
//! - `ReportWriter` - 写 CSV / 渲染 HTML 能力
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/section_grader` - 按班级筛选并逐条评分
//! - `orchestrator/submission` - 处理一次完整的评分请求
//!
//! ### ④ 服务层（Web）
//! - `web/` - 表单、上传、下载
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod web;

// 重新导出常用类型
pub use config::{Config, GradingMode};
pub use error::{AppError, AppResult};
pub use extraction::{extract_answers, extract_answers_from_pdf};
pub use models::{AnswerSheet, Grade, GradeResult, Score, StudentRecord};
pub use orchestrator::{grade_section, GradingPipeline, SectionOutcome, Submission, SubmissionOutcome};
pub use services::{heuristic_grade, LlmService, ModelGrader};
