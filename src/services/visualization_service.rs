//! 动画渲染服务 - 业务能力层
//!
//! 只负责"把 Manim 脚本渲染成 mp4"能力，不关心脚本从哪里来

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::tail_text;

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// 渲染成功，`video_path` 是相对于视频目录的文件名
    Rendered { video_path: String },
    /// 渲染失败
    Failed { error: String },
}

/// 视频渲染接口
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render(&self, script: &str, scene_name: &str) -> RenderOutcome;
}

/// 基于 manim 命令行的渲染器
///
/// 职责：
/// - 写入脚本文件、调用 manim、收集输出视频
/// - 清理脚本和 manim 的中间文件，并发渲染互不影响
pub struct ManimRenderer {
    visualizations_dir: PathBuf,
    command: String,
    quality: String,
    extra_path: Option<String>,
}

impl ManimRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            visualizations_dir: config.visualizations_dir.clone(),
            command: config.manim_command.clone(),
            quality: config.manim_quality.clone(),
            extra_path: config.extra_path.clone(),
        }
    }

    pub fn visualizations_dir(&self) -> &Path {
        &self.visualizations_dir
    }

    /// 每次渲染使用独立的工作目录 `render_{id}`，manim 的 media 目录也落在其中
    async fn render_inner(&self, script: &str, scene_name: &str) -> AppResult<String> {
        let script_id = short_id();
        let work_dir = self.visualizations_dir.join(format!("render_{}", script_id));
        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| AppError::file(work_dir.display().to_string(), e))?;

        let result = self.render_in(&work_dir, &script_id, script, scene_name).await;

        // 无论成功与否都清理本次的工作目录
        self.cleanup_work_dir(&work_dir).await;

        result
    }

    async fn render_in(&self, work_dir: &Path, script_id: &str, script: &str, scene_name: &str) -> AppResult<String> {
        let script_filename = format!("manim_script_{}.py", script_id);
        let video_filename = format!("visualization_{}.mp4", script_id);
        let script_path = work_dir.join(&script_filename);

        tokio::fs::write(&script_path, normalize_script(script))
            .await
            .map_err(|e| AppError::file(script_path.display().to_string(), e))?;

        self.run_manim(work_dir, &script_filename, scene_name, &video_filename).await?;

        let media_videos = work_dir.join("media").join("videos");
        let produced = find_file(&media_videos, &video_filename).ok_or_else(|| {
            AppError::Render("Video file was not created despite successful command execution".to_string())
        })?;

        let target = self.visualizations_dir.join(&video_filename);
        tokio::fs::copy(&produced, &target)
            .await
            .map_err(|e| AppError::file(target.display().to_string(), e))?;

        Ok(video_filename)
    }

    async fn run_manim(&self, work_dir: &Path, script_filename: &str, scene_name: &str, video_filename: &str) -> AppResult<()> {
        let mut command = Command::new(&self.command);
        command
            .arg(format!("-{}", self.quality))
            .arg(script_filename)
            .arg(scene_name)
            .arg("-o")
            .arg(video_filename)
            .current_dir(work_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(extra) = &self.extra_path {
            let path = std::env::var("PATH").unwrap_or_default();
            command.env("PATH", format!("{}:{}", extra, path));
        }

        debug!("执行: {} -{} {} {}", self.command, self.quality, script_filename, scene_name);

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::Render(format!("Manim 未安装或不在 PATH 中 ({})，请执行: pip install manim", self.command))
            } else {
                AppError::Render(format!("无法启动 manim: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("❌ Manim 命令失败，返回码: {:?}", output.status.code());
            return Err(AppError::Render(format!(
                "Manim command failed with return code {}: {}",
                output.status.code().map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()),
                tail_text(stderr.trim(), 500)
            )));
        }

        Ok(())
    }

    async fn cleanup_work_dir(&self, work_dir: &Path) {
        match tokio::fs::remove_dir_all(work_dir).await {
            Ok(()) => debug!("🧹 已删除工作目录: {}", work_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("无法删除工作目录 {}: {}", work_dir.display(), e),
        }
    }
}

#[async_trait]
impl VideoRenderer for ManimRenderer {
    async fn render(&self, script: &str, scene_name: &str) -> RenderOutcome {
        match self.render_inner(script, scene_name).await {
            Ok(video_path) => {
                info!("🎬 视频生成成功: {}", video_path);
                RenderOutcome::Rendered { video_path }
            }
            Err(e) => RenderOutcome::Failed { error: e.to_string() },
        }
    }
}

/// 整理 LLM 给出的脚本
///
/// - 整段没有真实换行时，把字面量 `\n` 还原成换行
/// - 缺少 manim 导入时补上 `from manim import *`
pub fn normalize_script(script: &str) -> String {
    let mut cleaned = if !script.contains('\n') && script.contains("\\n") {
        script.replace("\\n", "\n")
    } else {
        script.to_string()
    };

    if !cleaned.contains("from manim import") && !cleaned.contains("import manim") {
        cleaned = format!("from manim import *\n\n{}", cleaned);
    }

    if !cleaned.ends_with('\n') {
        cleaned.push('\n');
    }
    cleaned
}

/// 删除视频目录中超过 `max_age` 的普通文件，返回删除数量
pub async fn cleanup_old_files(dir: &Path, max_age: Duration) -> AppResult<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(AppError::file(dir.display().to_string(), e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file(dir.display().to_string(), e))?
    {
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age > max_age {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("无法删除过期文件 {}: {}", entry.path().display(), e),
            }
        }
    }

    if removed > 0 {
        info!("🧹 已清理 {} 个过期文件: {}", removed, dir.display());
    }
    Ok(removed)
}

fn find_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
