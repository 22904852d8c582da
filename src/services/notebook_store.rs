//! Notebook 存储服务 - 业务能力层
//!
//! 只负责"保存 notebook 文件 / 按文件名找回"能力

use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::Notebook;

/// 允许通过 HTTP 读取的扩展名
const ALLOWED_EXTENSIONS: &[&str] = &["ipynb", "json"];

pub struct NotebookStore {
    dir: PathBuf,
}

impl NotebookStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 保存 notebook，返回文件名
    pub async fn save(&self, notebook: &Notebook) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::file(self.dir.display().to_string(), e))?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let filename = format!("playground_{}_{}.ipynb", Local::now().format("%Y%m%d_%H%M%S"), &id[..8]);
        let path = self.dir.join(&filename);

        let content = serde_json::to_string_pretty(notebook)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;

        info!("📓 Notebook 已保存: {}", path.display());
        Ok(filename)
    }

    /// 校验文件名并返回完整路径（不检查文件是否存在）
    pub fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        validate_filename(filename)?;
        Ok(self.dir.join(filename))
    }

    /// 读取 notebook 原始内容
    pub async fn read(&self, filename: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("Notebook file not found".to_string()))
            }
            Err(e) => Err(AppError::file(path.display().to_string(), e)),
        }
    }
}

fn validate_filename(filename: &str) -> AppResult<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::BadRequest("Invalid notebook filename".to_string()));
    }

    let extension = filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::BadRequest("File is not a notebook".to_string())),
    }
}
