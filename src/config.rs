//! 程序配置
//!
//! 加载顺序：默认值 → TOML 文件（可选）→ 环境变量

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// 配置文件路径的环境变量名
pub const CONFIG_PATH_ENV: &str = "LEARNER_CONFIG";
/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "learner.toml";

/// 视频最长保留一年
const MAX_MEDIA_AGE_HOURS: u64 = 24 * 365;
/// 清理间隔最长一年
const MAX_CLEANUP_INTERVAL_MINUTES: u64 = 60 * 24 * 365;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 视频输出目录
    pub visualizations_dir: PathBuf,
    /// Notebook 输出目录
    pub notebooks_dir: PathBuf,
    /// 学习块 JSON 存档目录
    pub blocks_dir: PathBuf,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- Manim 配置 ---
    /// manim 可执行文件
    pub manim_command: String,
    /// 渲染质量参数（l / m / h）
    pub manim_quality: String,
    /// 追加到 PATH 前面的目录（例如 LaTeX 的 bin 目录）
    pub extra_path: Option<String>,
    /// 动画生成的最大尝试次数
    pub visualization_max_retries: u32,
    /// 两次尝试之间的等待时间（毫秒）
    pub visualization_retry_delay_ms: u64,
    // --- 内容生成 ---
    /// 截断后保留的最大词数
    pub max_text_words: usize,
    /// 超过这个词数才触发截断
    pub text_word_limit: usize,
    /// 同时处理的子主题数量
    pub max_concurrent_components: usize,
    // --- 清理 ---
    /// 视频文件的最长保留时间（小时）
    pub media_max_age_hours: u64,
    /// 清理任务的执行间隔（分钟），0 表示不启动
    pub cleanup_interval_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            visualizations_dir: PathBuf::from("visualizations"),
            notebooks_dir: PathBuf::from("notebooks"),
            blocks_dir: PathBuf::from("visualizations"),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash-002".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 4000,
            manim_command: "manim".to_string(),
            manim_quality: "ql".to_string(),
            extra_path: None,
            visualization_max_retries: 3,
            visualization_retry_delay_ms: 2000,
            max_text_words: 200,
            text_word_limit: 250,
            max_concurrent_components: 4,
            media_max_age_hours: 24,
            cleanup_interval_minutes: 60,
        }
    }
}

impl Config {
    /// 只读取环境变量（不读配置文件）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取配置文件（存在时）和环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            info!("📄 读取配置文件: {}", path);
            Self::from_toml_file(Path::new(&path))?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 解析 TOML 配置文件，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("TOML 解析失败: {}", e)))
    }

    fn with_env_overrides(self) -> Self {
        Self {
            host: env_string("HOST").unwrap_or(self.host),
            port: env_parse("BACKEND_PORT").unwrap_or(self.port),
            visualizations_dir: env_string("VISUALIZATIONS_DIR").map(PathBuf::from).unwrap_or(self.visualizations_dir),
            notebooks_dir: env_string("NOTEBOOKS_DIR").map(PathBuf::from).unwrap_or(self.notebooks_dir),
            blocks_dir: env_string("BLOCKS_DIR").map(PathBuf::from).unwrap_or(self.blocks_dir),
            llm_api_key: env_string("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: env_string("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env_string("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE").unwrap_or(self.llm_temperature),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(self.llm_max_tokens),
            manim_command: env_string("MANIM_COMMAND").unwrap_or(self.manim_command),
            manim_quality: env_string("MANIM_QUALITY").unwrap_or(self.manim_quality),
            extra_path: env_string("MANIM_EXTRA_PATH").or(self.extra_path),
            visualization_max_retries: env_parse("VISUALIZATION_MAX_RETRIES").unwrap_or(self.visualization_max_retries),
            visualization_retry_delay_ms: env_parse("VISUALIZATION_RETRY_DELAY_MS").unwrap_or(self.visualization_retry_delay_ms),
            max_text_words: env_parse("MAX_TEXT_WORDS").unwrap_or(self.max_text_words),
            text_word_limit: env_parse("TEXT_WORD_LIMIT").unwrap_or(self.text_word_limit),
            max_concurrent_components: env_parse("MAX_CONCURRENT_COMPONENTS").unwrap_or(self.max_concurrent_components),
            media_max_age_hours: env_parse("MEDIA_MAX_AGE_HOURS").unwrap_or(self.media_max_age_hours),
            cleanup_interval_minutes: env_parse("CLEANUP_INTERVAL_MINUTES").unwrap_or(self.cleanup_interval_minutes),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(AppError::Config("缺少环境变量 LLM_API_KEY".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(AppError::Config(format!(
                "LLM_TEMPERATURE 必须在 0.0 到 2.0 之间，当前值: {}",
                self.llm_temperature
            )));
        }
        if self.llm_max_tokens == 0 {
            return Err(AppError::Config("LLM_MAX_TOKENS 必须是正整数".to_string()));
        }
        if self.port == 0 {
            return Err(AppError::Config("端口不能为 0".to_string()));
        }
        if self.visualization_max_retries == 0 {
            return Err(AppError::Config("VISUALIZATION_MAX_RETRIES 至少为 1".to_string()));
        }
        if self.max_concurrent_components == 0 {
            return Err(AppError::Config("MAX_CONCURRENT_COMPONENTS 至少为 1".to_string()));
        }
        if self.media_max_age_hours > MAX_MEDIA_AGE_HOURS {
            return Err(AppError::Config(format!(
                "MEDIA_MAX_AGE_HOURS 不能超过 {}，当前值: {}",
                MAX_MEDIA_AGE_HOURS, self.media_max_age_hours
            )));
        }
        if self.cleanup_interval_minutes > MAX_CLEANUP_INTERVAL_MINUTES {
            return Err(AppError::Config(format!(
                "CLEANUP_INTERVAL_MINUTES 不能超过 {}，当前值: {}",
                MAX_CLEANUP_INTERVAL_MINUTES, self.cleanup_interval_minutes
            )));
        }
        if self.max_text_words > self.text_word_limit {
            warn!(
                "MAX_TEXT_WORDS ({}) 大于 TEXT_WORD_LIMIT ({})，截断不会缩短文本",
                self.max_text_words, self.text_word_limit
            );
        }
        Ok(())
    }

    /// 创建所有输出目录
    pub fn ensure_dirs(&self) -> AppResult<()> {
        for dir in [&self.visualizations_dir, &self.notebooks_dir, &self.blocks_dir] {
            std::fs::create_dir_all(dir).map_err(|e| AppError::file(dir.display().to_string(), e))?;
        }
        Ok(())
    }

    /// 视频文件的最长保留时间
    pub fn media_max_age(&self) -> Duration {
        Duration::from_secs(self.media_max_age_hours.saturating_mul(3600))
    }

    /// 清理任务的执行间隔
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_minutes.saturating_mul(60))
    }

    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
