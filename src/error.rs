//! 应用程序错误类型

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// LLM 服务错误
    #[error("LLM错误 (模型: {model}): {message}")]
    Llm { model: String, message: String },

    /// 动画渲染错误
    #[error("渲染错误: {0}")]
    Render(String),

    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化 / 解析失败
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 请求参数不合法
    #[error("{0}")]
    BadRequest(String),

    /// 请求体无法解析
    #[error("{0}")]
    InvalidBody(String),

    /// 资源不存在
    #[error("{0}")]
    NotFound(String),

    /// 内容生成失败
    #[error("{0}")]
    Generation(String),

    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

impl AppError {
    /// 创建文件错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// 创建 LLM 错误
    pub fn llm(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm {
            model: model.into(),
            message: message.to_string(),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::InvalidBody(_) => 422,
            AppError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other(format!("{:#}", err))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
