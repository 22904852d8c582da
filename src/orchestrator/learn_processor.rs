//! 学习请求处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **主题拆解**：调用 LLM 把主题拆成若干子主题
//! 2. **并发处理**：以有限并发逐个处理子主题（`BlockFlow`），结果保持原顺序
//! 3. **失败统计**：失败的学习块超过一半时整个请求失败
//! 4. **产物保存**：学习块存档、练习 notebook
//!
//! 不做具体的文本生成或渲染，全部委托给 workflow / services

use std::sync::Arc;

use chrono::Local;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{LearnRequest, LearnResponse, LearningBlock, LearningBlockResponse};
use crate::services::{BlockStore, ChatModel, NotebookStore, VideoRenderer};
use crate::utils::{log_learn_complete, truncate_text};
use crate::workflow::{build_playground, parse_breakdown_response, parse_topics, prompts, BlockFlow, BlockFlowSettings};

/// 学习请求处理器
pub struct LearnProcessor {
    llm: Arc<dyn ChatModel>,
    block_flow: BlockFlow,
    block_store: BlockStore,
    notebook_store: Arc<NotebookStore>,
    max_concurrent: usize,
}

impl LearnProcessor {
    pub fn new(
        config: &Config,
        llm: Arc<dyn ChatModel>,
        renderer: Arc<dyn VideoRenderer>,
        notebook_store: Arc<NotebookStore>,
    ) -> Self {
        Self {
            block_flow: BlockFlow::new(llm.clone(), renderer, BlockFlowSettings::from(config)),
            llm,
            block_store: BlockStore::new(config.blocks_dir.clone()),
            notebook_store,
            max_concurrent: config.max_concurrent_components.max(1),
        }
    }

    /// 处理一次 `/learn` 请求
    pub async fn learn(&self, request: &LearnRequest) -> AppResult<LearnResponse> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(AppError::BadRequest("Topic must not be empty".to_string()));
        }

        info!("📚 收到学习请求: {}", truncate_text(topic, 80));

        let blocks = match request.subtopics.as_deref() {
            Some(list) if !list.trim().is_empty() => {
                let topics = parse_topics(list);
                self.process_topics(&topics, &request.user_preferences).await
            }
            _ => self.process_single_topic(topic, &request.user_preferences).await?,
        };

        if blocks.is_empty() {
            return Err(AppError::BadRequest(
                "No learning components could be generated for this topic".to_string(),
            ));
        }

        let total = blocks.len();
        let failed = blocks.iter().filter(|b| b.failed).count();
        if failed * 2 > total {
            error!("❌ 失败的子主题过多: {}/{}", failed, total);
            return Err(AppError::Generation(format!(
                "Too many components failed to generate content ({}/{}). Please try a different topic or check the system logs.",
                failed, total
            )));
        }

        let components: Vec<String> = blocks.iter().map(|b| b.topic.clone()).collect();
        info!("🔧 子主题: {:?}", components);

        self.block_store.save(&blocks).await?;

        let playground = build_playground(&blocks);
        let playground_path = self.notebook_store.save(&playground).await?;

        let videos = blocks.iter().filter(|b| b.has_visualization()).count();
        log_learn_complete(topic, total, failed, videos);

        Ok(LearnResponse {
            learning_blocks: blocks.iter().map(LearningBlockResponse::from).collect(),
            playground_path,
            playground,
            main_topic: request.topic.clone(),
            components,
            timestamp: Local::now(),
        })
    }

    /// 调用 LLM 拆解主题
    pub async fn break_down_topic(&self, topic: &str) -> AppResult<Vec<String>> {
        info!("🔍 拆解主题: {}", topic);

        let response = self
            .llm
            .complete(prompts::TOPIC_BREAKDOWN, &prompts::breakdown_user_message(topic))
            .await?;

        let components = parse_breakdown_response(&response);
        info!("📋 找到 {} 个子主题", components.len());
        Ok(components)
    }

    /// 拆解主题后逐个处理子主题
    pub async fn process_single_topic(&self, topic: &str, user_preferences: &str) -> AppResult<Vec<LearningBlock>> {
        let components = self.break_down_topic(topic).await?;

        if components.is_empty() {
            warn!("❌ 主题没有拆出任何子主题: {}", topic);
            return Ok(Vec::new());
        }

        Ok(self.process_topics(&components, user_preferences).await)
    }

    /// 处理子主题列表，id 从 1 开始按输入顺序编号
    ///
    /// 单个子主题失败时生成失败占位块，不会中断其它子主题
    pub async fn process_topics(&self, topics: &[String], user_preferences: &str) -> Vec<LearningBlock> {
        let total = topics.len();
        let flow = &self.block_flow;

        stream::iter(topics.iter().cloned().enumerate())
            .map(|(index, topic): (usize, String)| async move {
                let id = (index + 1) as u32;
                match flow.run(&topic, id, user_preferences).await {
                    Ok(block) => {
                        info!("✅ 完成子主题 {}/{}: {}", id, total, topic);
                        block
                    }
                    Err(e) => {
                        error!("❌ 处理子主题失败 '{}': {:#}", topic, e);
                        LearningBlock::failed(id, topic.as_str(), format!("{:#}", e))
                    }
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
