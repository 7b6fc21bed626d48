use std::fmt;

/// skywise 的统一错误类型
///
/// 注意：天气接口返回非 200 时并不会产生这里的错误，而是生成
/// `{"error": ...}` 记录交给模型处理，见 [`crate::weather::ErrorRecord`]。
#[derive(Debug)]
pub enum SkywiseError {
    /// LLM 相关错误
    Llm(LlmError),
    /// 天气服务错误
    Weather(WeatherError),
    /// 工具调用错误
    Tool(ToolError),
    /// 解析错误
    Parse(ParseError),
    /// 配置错误
    Config(ConfigError),
    /// IO 错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

/// LLM 相关错误
#[derive(Debug)]
pub enum LlmError {
    /// 网络请求失败
    NetworkError(String),
    /// API 返回错误状态码
    ApiError { status: u16, message: String },
    /// 响应格式无效
    InvalidResponse(String),
    /// 没有返回内容
    EmptyResponse,
}

/// 天气服务错误（仅限传输层和响应体问题，HTTP 状态码错误不在此列）
#[derive(Debug)]
pub enum WeatherError {
    /// 网络请求失败
    NetworkError(String),
    /// 响应体缺少字段或格式不对
    InvalidResponse(String),
}

/// 工具调用错误
#[derive(Debug)]
pub enum ToolError {
    /// 工具未找到
    NotFound(String),
    /// 参数缺失
    MissingParameter(String),
    /// 参数类型错误
    InvalidParameter { name: String, message: String },
}

/// 解析错误
#[derive(Debug)]
pub enum ParseError {
    /// JSON 解析错误
    JsonError(String),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),
    /// 配置解析失败
    ParseFailed(String),
    /// 缺少必需的配置项
    MissingField(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
}

impl fmt::Display for SkywiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkywiseError::Llm(e) => write!(f, "LLM Error: {}", e),
            SkywiseError::Weather(e) => write!(f, "Weather Error: {}", e),
            SkywiseError::Tool(e) => write!(f, "Tool Error: {}", e),
            SkywiseError::Parse(e) => write!(f, "Parse Error: {}", e),
            SkywiseError::Config(e) => write!(f, "Config Error: {}", e),
            SkywiseError::Io(e) => write!(f, "IO Error: {}", e),
            SkywiseError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LlmError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LlmError::EmptyResponse => write!(f, "Empty response from LLM"),
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            WeatherError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::NotFound(name) => write!(f, "Tool '{}' not found", name),
            ToolError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ToolError::InvalidParameter { name, message } => {
                write!(f, "Invalid parameter '{}': {}", name, message)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::JsonError(msg) => write!(f, "JSON parse error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::MissingField(field) => write!(f, "Missing config field: {}", field),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for SkywiseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SkywiseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for LlmError {}
impl std::error::Error for WeatherError {}
impl std::error::Error for ToolError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ConfigError {}

// From 转换实现
impl From<std::io::Error> for SkywiseError {
    fn from(err: std::io::Error) -> Self {
        SkywiseError::Io(err)
    }
}

/// 默认归为 LLM 网络错误；天气客户端自行转换为 [`WeatherError`]
impl From<reqwest::Error> for SkywiseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SkywiseError::Llm(LlmError::NetworkError("Request timeout".to_string()))
        } else if err.is_connect() {
            SkywiseError::Llm(LlmError::NetworkError(format!(
                "Connection failed: {}",
                err
            )))
        } else {
            SkywiseError::Llm(LlmError::NetworkError(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for SkywiseError {
    fn from(err: serde_json::Error) -> Self {
        SkywiseError::Parse(ParseError::JsonError(err.to_string()))
    }
}

impl From<serde_yaml::Error> for SkywiseError {
    fn from(err: serde_yaml::Error) -> Self {
        SkywiseError::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

impl From<LlmError> for SkywiseError {
    fn from(err: LlmError) -> Self {
        SkywiseError::Llm(err)
    }
}

impl From<WeatherError> for SkywiseError {
    fn from(err: WeatherError) -> Self {
        SkywiseError::Weather(err)
    }
}

impl From<ToolError> for SkywiseError {
    fn from(err: ToolError) -> Self {
        SkywiseError::Tool(err)
    }
}

impl From<ParseError> for SkywiseError {
    fn from(err: ParseError) -> Self {
        SkywiseError::Parse(err)
    }
}

impl From<ConfigError> for SkywiseError {
    fn from(err: ConfigError) -> Self {
        SkywiseError::Config(err)
    }
}

// 便捷的 Result 类型别名
pub type Result<T> = std::result::Result<T, SkywiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nests_inner_error() {
        let err: SkywiseError = ToolError::NotFound("get_stock_price".to_string()).into();
        assert_eq!(err.to_string(), "Tool Error: Tool 'get_stock_price' not found");

        let err: SkywiseError = LlmError::ApiError {
            status: 429,
            message: "rate limited".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "LLM Error: API error (status 429): rate limited");
    }

    #[test]
    fn test_json_error_becomes_parse_error() {
        let err: SkywiseError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, SkywiseError::Parse(ParseError::JsonError(_))));
    }

    #[test]
    fn test_yaml_error_becomes_config_error() {
        let err: SkywiseError = serde_yaml::from_str::<Vec<String>>("a: [")
            .unwrap_err()
            .into();
        assert!(matches!(err, SkywiseError::Config(ConfigError::ParseFailed(_))));
    }
}
