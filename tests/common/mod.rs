//! 集成测试共用的假模型和假渲染器

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use topic_learner::workflow::prompts;
use topic_learner::{router, AppState, ChatModel, Config, RenderOutcome, VideoRenderer};

pub const FAKE_VIDEO: &[u8] = b"0123456789fake-mp4-bytes";

pub const SCRIPT_REPLY: &str =
    "```python\nfrom manim import *\n\nclass DemoScene(Scene):\n    def construct(self):\n        self.wait(1)\n```";

/// 根据系统提示词区分拆解 / 文本 / 动画三类请求
pub struct FakeModel {
    pub breakdown: Result<String, String>,
    /// 文本生成会失败的子主题
    pub failing_topics: Vec<String>,
    /// 需要动画的子主题
    pub visual_topics: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeModel {
    pub fn new(breakdown: &str) -> Self {
        Self {
            breakdown: Ok(breakdown.to_string()),
            failing_topics: Vec::new(),
            visual_topics: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_breakdown(error: &str) -> Self {
        Self {
            breakdown: Err(error.to_string()),
            ..Self::new("")
        }
    }

    pub fn failing(mut self, topics: &[&str]) -> Self {
        self.failing_topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn visual(mut self, topics: &[&str]) -> Self {
        self.visual_topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn complete(&self, system_message: &str, user_message: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if system_message == prompts::TOPIC_BREAKDOWN {
            return self.breakdown.clone().map_err(|e| anyhow::anyhow!(e));
        }

        if system_message == prompts::VISUALIZATION {
            let visual = self
                .visual_topics
                .iter()
                .any(|t| user_message.contains(&format!("\"{}\"", t)));
            return Ok(if visual { SCRIPT_REPLY } else { prompts::NO_VISUALIZATION }.to_string());
        }

        let topic = user_message.rsplit(": ").next().unwrap_or_default();
        if self.failing_topics.iter().any(|t| t == topic) {
            anyhow::bail!("upstream timeout for {}", topic);
        }
        Ok(format!("## {}\n\n- key idea", topic))
    }
}

/// 直接把固定内容写成视频文件
pub struct FakeRenderer {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl FakeRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VideoRenderer for FakeRenderer {
    async fn render(&self, _script: &str, _scene_name: &str) -> RenderOutcome {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let name = format!("visualization_test{}.mp4", n);
        match tokio::fs::write(self.dir.join(&name), FAKE_VIDEO).await {
            Ok(()) => RenderOutcome::Rendered { video_path: name },
            Err(e) => RenderOutcome::Failed { error: e.to_string() },
        }
    }
}

/// 每个测试独立的目录和配置
pub struct TestEnv {
    pub dir: TempDir,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config {
            llm_api_key: "test-key".to_string(),
            visualizations_dir: dir.path().join("visualizations"),
            notebooks_dir: dir.path().join("notebooks"),
            blocks_dir: dir.path().join("blocks"),
            visualization_retry_delay_ms: 0,
            ..Config::default()
        };
        config.ensure_dirs().expect("create dirs");
        Self { dir, config }
    }

    pub fn router(&self, model: FakeModel) -> axum::Router {
        let renderer = FakeRenderer::new(self.config.visualizations_dir.clone());
        router(AppState::new(&self.config, Arc::new(model), Arc::new(renderer)))
    }
}
