use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::orchestrator::LearnProcessor;
use crate::services::{ChatModel, LlmService, ManimRenderer, NotebookStore, VideoRenderer};

/// 所有请求共享的状态
pub struct AppState {
    pub processor: LearnProcessor,
    pub notebook_store: Arc<NotebookStore>,
    pub visualizations_dir: PathBuf,
}

impl AppState {
    /// 使用指定的模型和渲染器创建状态
    pub fn new(config: &Config, llm: Arc<dyn ChatModel>, renderer: Arc<dyn VideoRenderer>) -> Self {
        let notebook_store = Arc::new(NotebookStore::new(config.notebooks_dir.clone()));
        Self {
            processor: LearnProcessor::new(config, llm, renderer, notebook_store.clone()),
            notebook_store,
            visualizations_dir: config.visualizations_dir.clone(),
        }
    }

    /// 使用真实的 LLM 服务和 manim 渲染器
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(LlmService::new(config)),
            Arc::new(ManimRenderer::new(config)),
        )
    }
}

pub type SharedState = Arc<AppState>;
