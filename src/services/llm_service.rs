//! LLM 服务 - 业务能力层
//!
//! 只负责"调用 LLM 拿到文本回复"能力，不关心评分逻辑
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};

/// 文本生成能力
///
/// 评分器只依赖这个 trait，测试时可以注入固定回复或必然失败的实现
pub trait TextGenerator {
    /// 发送提示词，返回模型的文本回复
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// LLM 服务
///
/// 职责：
/// - 持有 OpenAI 兼容客户端
/// - 提供通用的 LLM 调用接口
/// - 不解析分数，不做回退
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    ///
    /// # 示例
    /// ```no_run
    /// # use answer_grader::services::LlmService;
    /// # async fn example(service: &LlmService) -> anyhow::Result<()> {
    /// let response = service
    ///     .send_to_llm("What is TCP?", Some("Answer in one sentence."))
    ///     .await?;
    /// println!("LLM 响应: {}", response);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        // 调用 API，超时使用客户端默认值
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}

impl TextGenerator for LlmService {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        self.send_to_llm(prompt, None)
    }
}
