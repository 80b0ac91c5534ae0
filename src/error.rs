//! 错误类型定义
//!
//! 顶层 `AppError` 包装各个关注点的错误枚举；
//! `AnalysisFailure` 单独存在，只在分析阶段内部被吸收，永远不会升级为 `AppError`。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（未上传图片 / 提示词为空）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 本地图片编码失败
    #[error("读取错误: {0}")]
    Read(#[from] ReadError),
    /// 编辑阶段失败（整批作废）
    #[error("生成失败: {0}")]
    Generation(#[from] GenerationFailure),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 已有一轮生成正在进行
    #[error("已有一轮生成正在进行中")]
    CycleInFlight,
    /// 生成期间源图片被更换，本轮结果被丢弃
    #[error("源图片在生成期间被更换，本轮结果已丢弃")]
    CycleAbandoned,
}

impl AppError {
    /// 面向展示层的纯文本错误信息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => {
                "Please upload an image and provide a design prompt.".to_string()
            }
            AppError::Read(_) => "Could not process the image. Please try another file.".to_string(),
            AppError::Generation(_) => {
                "Failed to generate image with Gemini API.".to_string()
            }
            AppError::Config(e) => e.to_string(),
            AppError::CycleInFlight => "A generation is already in progress.".to_string(),
            AppError::CycleAbandoned => {
                "The source image changed while designs were generating.".to_string()
            }
        }
    }
}

/// 输入校验错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("未选择源图片")]
    MissingImage,
    #[error("设计提示词为空")]
    EmptyPrompt,
}

/// 图片编码错误
#[derive(Debug, Error)]
pub enum ReadError {
    /// 读取文件失败
    #[error("读取图片文件失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// data URI 缺少 `base64,` 前缀分隔符
    #[error("无法识别的 data URI")]
    MalformedDataUri,
    /// data URI 中的 base64 内容无效
    #[error("data URI 中的 base64 内容无效: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// 远程 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 响应体 JSON 解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// 响应中没有任何图片数据
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("模型 {model} 的响应中没有图片数据")]
pub struct NoContentError {
    pub model: String,
}

/// 单次编辑请求的错误
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    NoContent(#[from] NoContentError),
}

/// 编辑阶段失败：携带失败请求的序号和底层原因
#[derive(Debug, Error)]
#[error("第 {index} 个编辑请求失败: {source}")]
pub struct GenerationFailure {
    pub index: usize,
    #[source]
    pub source: EditError,
}

/// 单次分析请求的错误，只在本地被吸收
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 响应中没有文本
    #[error("分析响应中没有文本")]
    EmptyText,
    /// JSON 解析失败或不符合 {pros, cons} 结构
    #[error("分析结果不符合预期结构: {0}")]
    Schema(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥，拒绝启动
    #[error("GEMINI_API_KEY (或 API_KEY) 环境变量未设置")]
    MissingApiKey,
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    HttpClient(#[source] reqwest::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建编辑阶段失败错误
    pub fn generation_failed(index: usize, source: impl Into<EditError>) -> Self {
        AppError::Generation(GenerationFailure {
            index,
            source: source.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
