//! HTTP 请求 / 响应结构

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::learning_block::LearningBlock;
use crate::models::notebook::Notebook;

/// `POST /learn` 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnRequest {
    /// 要拆解学习的主题
    pub topic: String,
    /// 用户偏好（自由文本）
    #[serde(default)]
    pub user_preferences: String,
    /// 预先给定的子主题列表（换行或逗号分隔），提供时跳过 LLM 拆解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopics: Option<String>,
}

/// 响应中的学习块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningBlockResponse {
    pub id: u32,
    pub topic: String,
    pub text_content: String,
    pub visualization_path: Option<String>,
}

impl From<&LearningBlock> for LearningBlockResponse {
    fn from(block: &LearningBlock) -> Self {
        Self {
            id: block.id,
            topic: block.topic.clone(),
            text_content: block.text_content.clone(),
            visualization_path: block.visualization_path.clone(),
        }
    }
}

/// `POST /learn` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnResponse {
    pub learning_blocks: Vec<LearningBlockResponse>,
    /// 保存后的 notebook 文件名，可通过 `/notebook/{filename}` 获取
    pub playground_path: String,
    pub playground: Notebook,
    pub main_topic: String,
    pub components: Vec<String>,
    pub timestamp: DateTime<Local>,
}

/// `GET /health` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Local>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Local::now(),
        }
    }
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
