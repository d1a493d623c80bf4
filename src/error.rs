use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表单输入错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// PDF 文本提取错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 报告写入错误
    #[error("报告错误: {0}")]
    Report(#[from] ReportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// HTTP 服务错误
    #[error("服务错误 ({context}): {source}")]
    Server {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// 表单输入错误
///
/// Display 文本会直接展示给用户，所以保持英文
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// 题目为空
    #[error("Please enter the question.")]
    MissingQuestion,
    /// 班级为空
    #[error("Please enter/select a section.")]
    MissingSection,
    /// 未上传文件或文件不是 PDF
    #[error("Please upload a valid PDF file.")]
    InvalidPdf,
    /// multipart 解析失败
    #[error("Could not read the submitted form: {0}")]
    MalformedForm(String),
}

/// PDF 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 文档无法作为 PDF 打开
    #[error("无法打开 PDF 文档: {source}")]
    UnreadableDocument {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 上传文件保存失败
    #[error("无法保存上传文件 ({path}): {source}")]
    UploadSaveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 报告写入错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 写入文件失败
    #[error("写入报告失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 报告尚未生成
    #[error("报告不存在: {path}")]
    NotFound { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 监听地址解析失败
    #[error("监听地址 {value} 无效: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 PDF 打开失败错误
    pub fn unreadable_pdf(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Extraction(ExtractionError::UnreadableDocument {
            source: Box::new(source),
        })
    }

    /// 创建报告写入错误
    pub fn report_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Report(ReportError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 是否应该作为提示信息返回给用户（而不是服务器错误）
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Input(_) | AppError::Extraction(_) | AppError::Report(_)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
