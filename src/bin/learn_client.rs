//! 命令行客户端：请求 `/learn` 并把练习 notebook 保存到本地
//!
//! ```bash
//! learn_client "linear functions" "I want to see visual examples"
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use topic_learner::logger;
use topic_learner::models::{LearnRequest, LearnResponse};

const DEFAULT_URL: &str = "http://localhost:8000";
const OUTPUT_FILE: &str = "generated_notebook.ipynb";

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let Some(topic) = args.next() else {
        bail!("用法: learn_client <topic> [user_preferences]");
    };
    let user_preferences = args.next().unwrap_or_default();
    let base_url = std::env::var("LEARNER_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()?;

    info!("📨 请求 {}/learn，主题: {}", base_url, topic);
    let response = client
        .post(format!("{}/learn", base_url))
        .json(&LearnRequest {
            topic,
            user_preferences,
            subtopics: None,
        })
        .send()
        .await
        .with_context(|| format!("无法连接 {}，请确认服务已启动", base_url))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("请求失败 ({}): {}", status, body);
    }

    let data: LearnResponse = response.json().await.context("响应解析失败")?;

    info!("✅ 主题: {}", data.main_topic);
    info!("🔧 子主题: {:?}", data.components);
    for block in &data.learning_blocks {
        match &block.visualization_path {
            Some(path) => info!("  学习块 {}: {} (🎥 {})", block.id, block.topic, path),
            None => info!("  学习块 {}: {}", block.id, block.topic),
        }
    }

    if let Some(path) = data.learning_blocks.iter().find_map(|b| b.visualization_path.as_ref()) {
        let url = format!("{}/visualization/{}", base_url, path);
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let size = resp.bytes().await.map(|b| b.len()).unwrap_or_default();
                info!("🎥 视频接口正常 ({} 字节)", size);
            }
            Ok(resp) => warn!("视频接口返回 {}", resp.status()),
            Err(e) => warn!("视频接口请求失败: {}", e),
        }
    }

    let content = serde_json::to_string_pretty(&data.playground)?;
    tokio::fs::write(OUTPUT_FILE, content).await?;
    info!("📓 Notebook 已保存到 {} (服务端文件: {})", OUTPUT_FILE, data.playground_path);

    Ok(())
}
