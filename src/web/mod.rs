//! HTTP 服务层
//!
//! 只负责表单解析、重定向和文件下载，评分逻辑全部委托给 `GradingPipeline`

pub mod handlers;
pub mod page;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use crate::orchestrator::GradingPipeline;
use crate::services::AnswerGrader;

/// 所有 handler 共享的状态
pub struct AppState<G> {
    pub pipeline: Arc<GradingPipeline<G>>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

/// 构建路由
///
/// # 参数
/// - `pipeline`: 评分流水线
/// - `max_upload_bytes`: 上传大小上限
pub fn router<G>(pipeline: Arc<GradingPipeline<G>>, max_upload_bytes: usize) -> Router
where
    G: AnswerGrader + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::index))
        .route("/grade", post(handlers::grade::<G>))
        .route("/download", get(handlers::download::<G>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(AppState { pipeline })
}

/// 启动 HTTP 服务，直到进程退出
pub async fn serve<G>(config: &Config, pipeline: Arc<GradingPipeline<G>>) -> AppResult<()>
where
    G: AnswerGrader + Send + Sync + 'static,
{
    let addr: std::net::SocketAddr =
        config
            .bind_addr
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: config.bind_addr.clone(),
                source,
            })?;

    let app = router(pipeline, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Server {
            context: format!("无法监听 {}", addr),
            source,
        })?;

    info!("🌐 服务已启动: http://{}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|source| AppError::Server {
            context: "HTTP 服务异常退出".to_string(),
            source,
        })?;

    Ok(())
}
