/// 评分模式
///
/// 只在启动时根据配置计算一次，之后显式传入评分器
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradingMode {
    /// 调用远程 LLM，失败时回退到启发式评分
    Remote,
    /// 只使用本地启发式评分
    HeuristicOnly,
}

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 上传文件存放目录
    pub upload_folder: String,
    /// CSV 报告路径（每次评分覆盖）
    pub report_path: String,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 评分日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            upload_folder: "uploads".to_string(),
            report_path: "graded_feedback.csv".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            verbose_logging: false,
            output_log_file: "grading_log.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置（会先读取 .env 文件）
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置，未设置或无法解析的值使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(default.bind_addr),
            upload_folder: lookup("UPLOAD_FOLDER").unwrap_or(default.upload_folder),
            report_path: lookup("REPORT_PATH").unwrap_or(default.report_path),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()).unwrap_or(default.max_upload_bytes),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            llm_api_key: lookup("LLM_API_KEY").map(|v| v.trim().to_string()).unwrap_or(default.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 根据 API key 决定评分模式
    ///
    /// key 为空或明显是占位符时，整个进程固定使用启发式评分
    pub fn grading_mode(&self) -> GradingMode {
        if is_placeholder_key(&self.llm_api_key) {
            GradingMode::HeuristicOnly
        } else {
            GradingMode::Remote
        }
    }
}

/// 判断 API key 是否为空或占位符
fn is_placeholder_key(key: &str) -> bool {
    const PLACEHOLDER_PREFIXES: [&str; 5] = ["your", "sk-your", "change", "placeholder", "<"];

    let key = key.trim().to_lowercase();
    key.is_empty()
        || PLACEHOLDER_PREFIXES.iter().any(|p| key.starts_with(p))
        || key.chars().all(|c| c == 'x' || c == '*' || c == '-')
}
