//! 程序配置
//!
//! 加载顺序：默认值 < TOML 配置文件（`DESIGNER_CONFIG` 指定路径）< 环境变量。
//! API 密钥缺失时拒绝启动。

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- Gemini 配置 ---
    pub api_key: String,
    pub api_base_url: String,
    /// 图片编辑模型
    pub image_model: String,
    /// 图片分析模型（文本 + 视觉）
    pub text_model: String,
    /// 单个 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 结果输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            request_timeout_secs: 120,
            output_dir: "output_designs".to_string(),
            verbose_logging: false,
        }
    }
}

/// 配置文件中的可选字段
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    api_base_url: Option<String>,
    image_model: Option<String>,
    text_model: Option<String>,
    request_timeout_secs: Option<u64>,
    output_dir: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("DESIGNER_CONFIG") {
            config = config.merge_file(Path::new(&path))?;
        }
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()
    }

    /// 合并 TOML 配置文件
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml(&content, &path.display().to_string())
    }

    fn merge_toml(mut self, content: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            })?;

        if let Some(v) = file.api_key {
            self.api_key = v;
        }
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.image_model {
            self.image_model = v;
        }
        if let Some(v) = file.text_model {
            self.text_model = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(self)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.api_key = v;
        }
        if let Some(v) = lookup("GEMINI_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("IMAGE_MODEL") {
            self.image_model = v;
        }
        if let Some(v) = lookup("TEXT_MODEL") {
            self.text_model = v;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(self)
    }
}

fn parse_env<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
