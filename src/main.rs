use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use answer_grader::utils::logging;
use answer_grader::{web, Config, GradingPipeline, LlmService, ModelGrader};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（只在启动时读取一次）
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);
    if let Err(e) = logging::init_log_file(&config.output_log_file) {
        warn!("⚠️ 无法初始化评分日志文件 {}: {}", config.output_log_file, e);
    }

    let mode = config.grading_mode();
    logging::log_startup(&config, mode);

    // 初始化评分器和流水线
    let grader = ModelGrader::new(mode, LlmService::new(&config));
    let pipeline = Arc::new(GradingPipeline::new(&config, grader));

    web::serve(&config, pipeline).await?;

    Ok(())
}
