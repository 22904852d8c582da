/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 学习助手 API 启动");
    info!("🌐 监听地址: http://{}", config.bind_addr());
    info!("🤖 LLM 模型: {}", config.llm_model_name);
    info!("🎬 视频目录: {}", config.visualizations_dir.display());
    info!("📓 Notebook 目录: {}", config.notebooks_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录一次学习请求的完成统计
///
/// # 参数
/// - `topic`: 主题
/// - `total`: 学习块总数
/// - `failed`: 失败数量
/// - `videos`: 带视频的学习块数量
pub fn log_learn_complete(topic: &str, total: usize, failed: usize, videos: usize) {
    info!("{}", "─".repeat(60));
    info!("📋 主题 \"{}\" 处理完成", truncate_text(topic, 40));
    info!("✅ 学习块: {}/{}", total - failed, total);
    info!("🎥 视频: {}", videos);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 保留文本末尾的若干字符（用于 stderr 等输出）
pub fn tail_text(text: &str, max_len: usize) -> String {
    let count = text.chars().count();
    if count > max_len {
        "...".to_string() + &text.chars().skip(count - max_len).collect::<String>()
    } else {
        text.to_string()
    }
}
