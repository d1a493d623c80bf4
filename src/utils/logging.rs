/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, GradingMode};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n评分日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行（带时间戳）
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, mode: GradingMode) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 答案评分服务");
    info!("🌐 监听地址: {}", config.bind_addr);
    match mode {
        GradingMode::Remote => info!("🤖 评分模式: LLM ({})", config.llm_model_name),
        GradingMode::HeuristicOnly => info!("🧮 评分模式: 启发式（未配置有效的 LLM_API_KEY）"),
    }
    info!("📄 报告路径: {}", config.report_path);
    info!("{}", "=".repeat(60));
}

/// 记录评分请求开始
///
/// # 参数
/// - `question`: 题目
/// - `section`: 班级
/// - `file_name`: 上传的文件名
pub fn log_request_start(question: &str, section: &str, file_name: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📥 收到评分请求: {}", file_name);
    info!("📝 题目: {}", truncate_text(question, 80));
    info!("👥 班级: {}", section);
}

/// 记录评分请求完成
///
/// # 参数
/// - `graded`: 成功评分数量
/// - `warnings`: 警告数量
/// - `extracted`: 提取出的记录总数
pub fn log_request_complete(graded: usize, warnings: usize, extracted: usize) {
    info!("✅ 评分完成: 成功 {}, 警告 {}, 提取记录 {}", graded, warnings, extracted);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
