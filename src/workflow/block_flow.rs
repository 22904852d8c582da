//! 学习块处理流程 - 流程层
//!
//! 核心职责：定义"一个子主题"的完整处理流程
//!
//! 流程顺序：
//! 1. LLM 生成讲解文本（超长截断 / 空结果兜底）
//! 2. LLM 判断是否需要动画，需要时给出 Manim 脚本
//! 3. 渲染视频（失败重试，最终失败则该学习块没有视频）

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::LearningBlock;
use crate::services::{ChatModel, RenderOutcome, VideoRenderer};
use crate::workflow::prompts;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[ \t]*(?:python|py)?[ \t]*\r?\n(.*?)```").expect("valid regex"));

static SCENE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+([A-Za-z_]\w*)\s*\(\s*[\w.]*Scene\s*\)").expect("valid regex")
});

/// 找不到场景类名时使用的默认值
pub const DEFAULT_SCENE_NAME: &str = "Scene";

/// 流程参数
#[derive(Debug, Clone)]
pub struct BlockFlowSettings {
    pub max_text_words: usize,
    pub text_word_limit: usize,
    pub visualization_max_retries: u32,
    pub retry_delay: Duration,
}

impl From<&Config> for BlockFlowSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_text_words: config.max_text_words,
            text_word_limit: config.text_word_limit,
            visualization_max_retries: config.visualization_max_retries.max(1),
            retry_delay: Duration::from_millis(config.visualization_retry_delay_ms),
        }
    }
}

/// 学习块处理流程
///
/// - 不持有任何文件或目录
/// - 只依赖业务能力（ChatModel / VideoRenderer）
pub struct BlockFlow {
    llm: Arc<dyn ChatModel>,
    renderer: Arc<dyn VideoRenderer>,
    settings: BlockFlowSettings,
}

impl BlockFlow {
    pub fn new(llm: Arc<dyn ChatModel>, renderer: Arc<dyn VideoRenderer>, settings: BlockFlowSettings) -> Self {
        Self { llm, renderer, settings }
    }

    /// 处理一个子主题
    ///
    /// 文本生成失败时返回错误；动画失败不会影响学习块
    pub async fn run(&self, topic: &str, id: u32, user_preferences: &str) -> Result<LearningBlock> {
        info!("[组件 {}] 📚 处理子主题: {}", id, topic);

        let text_content = self.generate_text(topic, id, user_preferences).await?;
        let visualization_path = self.generate_visualization(topic, id, &text_content).await;

        Ok(LearningBlock::new(id, topic, text_content).with_visualization(visualization_path))
    }

    async fn generate_text(&self, topic: &str, id: u32, user_preferences: &str) -> Result<String> {
        info!("[组件 {}] 📝 生成讲解文本", id);

        let content = self
            .llm
            .complete(&prompts::text_prompt(user_preferences), &prompts::text_user_message(topic))
            .await?;

        let content = limit_words(content.trim(), self.settings.text_word_limit, self.settings.max_text_words);

        if content.is_empty() {
            warn!("[组件 {}] ⚠️ 未生成文本，使用兜底内容", id);
            return Ok(fallback_text(topic));
        }

        info!(
            "[组件 {}] ✓ 文本 {} 字符 / {} 词",
            id,
            content.len(),
            content.split_whitespace().count()
        );
        Ok(content)
    }

    async fn generate_visualization(&self, topic: &str, id: u32, text_content: &str) -> Option<String> {
        let max_retries = self.settings.visualization_max_retries;
        let user_message = prompts::visualization_user_message(topic, text_content);

        for attempt in 1..=max_retries {
            info!("[组件 {}] 🎨 动画尝试 {}/{}", id, attempt, max_retries);

            match self.llm.complete(prompts::VISUALIZATION, &user_message).await {
                Ok(response) => {
                    let Some(script) = extract_manim_script(&response) else {
                        info!("[组件 {}] ℹ️ LLM 判断无需动画", id);
                        return None;
                    };

                    let scene_name = scene_name(&script);
                    match self.renderer.render(&script, &scene_name).await {
                        RenderOutcome::Rendered { video_path } => {
                            info!("[组件 {}] ✅ 动画生成成功 (第 {} 次尝试)", id, attempt);
                            return Some(video_path);
                        }
                        RenderOutcome::Failed { error } => {
                            warn!("[组件 {}] ❌ 第 {} 次渲染失败: {}", id, attempt, error);
                        }
                    }
                }
                Err(e) => {
                    warn!("[组件 {}] ❌ 第 {} 次动画请求失败: {}", id, attempt, e);
                }
            }

            if attempt < max_retries && !self.settings.retry_delay.is_zero() {
                tokio::time::sleep(self.settings.retry_delay).await;
            }
        }

        warn!("[组件 {}] ❌ 所有动画尝试均失败: {}", id, topic);
        None
    }
}

/// 词数超过 `limit` 时只保留前 `keep` 个词并追加 `...`
pub fn limit_words(content: &str, limit: usize, keep: usize) -> String {
    let word_count = content.split_whitespace().count();
    if word_count > limit {
        warn!("⚠️ 内容过长 ({} 词)，截断为 {} 词", word_count, keep);
        let mut trimmed = content.split_whitespace().take(keep).collect::<Vec<_>>().join(" ");
        trimmed.push_str("...");
        trimmed
    } else {
        content.to_string()
    }
}

/// 文本为空时的兜底内容
pub fn fallback_text(topic: &str) -> String {
    format!(
        "# {}\n\nEssential concepts for {}. Research this topic further for detailed information.",
        topic,
        topic.to_lowercase()
    )
}

/// 从 LLM 回复中取出 Manim 脚本
///
/// 返回 `None` 表示不需要动画
pub fn extract_manim_script(response: &str) -> Option<String> {
    if let Some(captures) = CODE_FENCE.captures(response) {
        let script = captures[1].trim();
        return (!script.is_empty()).then(|| script.to_string());
    }

    let trimmed = response.trim();
    if trimmed.contains(prompts::NO_VISUALIZATION) {
        return None;
    }

    // 没有代码块但整段就是脚本
    if SCENE_CLASS.is_match(trimmed) && trimmed.contains("def construct") {
        return Some(trimmed.to_string());
    }

    None
}

/// 脚本中第一个 Scene 子类的类名
pub fn scene_name(script: &str) -> String {
    SCENE_CLASS
        .captures(script)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| DEFAULT_SCENE_NAME.to_string())
}
