use serde::{Deserialize, Serialize};

/// 学习块：一个子主题的讲解内容和可选的动画视频
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningBlock {
    /// 在拆解结果中的位置（从 1 开始）
    pub id: u32,
    pub topic: String,
    /// Markdown 格式的讲解
    pub text_content: String,
    /// 相对于视频目录的 mp4 路径
    pub visualization_path: Option<String>,
    /// 处理失败时为 true，此时 text_content 是错误说明
    #[serde(skip)]
    pub failed: bool,
}

impl LearningBlock {
    pub fn new(id: u32, topic: impl Into<String>, text_content: impl Into<String>) -> Self {
        Self {
            id,
            topic: topic.into(),
            text_content: text_content.into(),
            visualization_path: None,
            failed: false,
        }
    }

    /// 子主题处理失败时生成的占位块
    pub fn failed(id: u32, topic: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            id,
            topic: topic.into(),
            text_content: format!("Error processing this component: {}", error),
            visualization_path: None,
            failed: true,
        }
    }

    pub fn with_visualization(mut self, path: Option<String>) -> Self {
        self.visualization_path = path;
        self
    }

    pub fn has_visualization(&self) -> bool {
        self.visualization_path.is_some()
    }
}
