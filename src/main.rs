use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use topic_learner::services::cleanup_old_files;
use topic_learner::utils::log_startup;
use topic_learner::{logger, router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::load()?;
    config.validate()?;
    config.ensure_dirs()?;

    log_startup(&config);

    spawn_cleanup_task(&config);

    let app = router(AppState::from_config(&config));

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    info!("👋 服务已停止");
    Ok(())
}

/// 定期清理过期的视频文件
fn spawn_cleanup_task(config: &Config) {
    if config.cleanup_interval_minutes == 0 {
        return;
    }

    let dir = config.visualizations_dir.clone();
    let max_age = config.media_max_age();
    let period = config.cleanup_interval();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = cleanup_old_files(&dir, max_age).await {
                warn!("清理过期文件失败: {}", e);
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭...");
}
