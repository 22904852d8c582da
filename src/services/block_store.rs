//! 学习块存档服务 - 业务能力层
//!
//! 只负责"把学习块写成 JSON 存档 / 读回"能力

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::LearningBlock;

pub const ARCHIVE_VERSION: &str = "1.0";

/// 存档文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockArchive {
    pub metadata: ArchiveMetadata,
    /// 以 id 字符串为键
    pub blocks: BTreeMap<String, ArchivedBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub generated_at: String,
    pub total_blocks: usize,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedBlock {
    pub id: u32,
    pub title: String,
    pub text_content: String,
    pub visualization_path: Option<String>,
}

impl BlockArchive {
    pub fn from_blocks(blocks: &[LearningBlock]) -> Self {
        let blocks_map = blocks
            .iter()
            .map(|block| {
                (
                    block.id.to_string(),
                    ArchivedBlock {
                        id: block.id,
                        title: block.topic.clone(),
                        text_content: block.text_content.clone(),
                        visualization_path: block.visualization_path.clone(),
                    },
                )
            })
            .collect();

        Self {
            metadata: ArchiveMetadata {
                generated_at: Local::now().to_rfc3339(),
                total_blocks: blocks.len(),
                version: ARCHIVE_VERSION.to_string(),
            },
            blocks: blocks_map,
        }
    }
}

/// 学习块存档服务
pub struct BlockStore {
    dir: PathBuf,
}

impl BlockStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 保存学习块，返回存档路径
    ///
    /// 文件名：`learning_blocks_{%Y%m%d_%H%M%S}_{id8}.json`
    pub async fn save(&self, blocks: &[LearningBlock]) -> AppResult<PathBuf> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let filename = format!("learning_blocks_{}_{}.json", Local::now().format("%Y%m%d_%H%M%S"), &id[..8]);
        self.save_as(blocks, &filename).await
    }

    pub async fn save_as(&self, blocks: &[LearningBlock], filename: &str) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::file(self.dir.display().to_string(), e))?;

        let path = self.dir.join(filename);
        let archive = BlockArchive::from_blocks(blocks);
        let content = serde_json::to_string_pretty(&archive)?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;

        info!("💾 学习块已保存: {}", path.display());
        Ok(path)
    }

    /// 读取存档
    pub async fn load(&self, path: &Path) -> AppResult<BlockArchive> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        let archive: BlockArchive = serde_json::from_str(&content)?;
        debug!("📂 已读取存档: {} ({} 个学习块)", path.display(), archive.metadata.total_blocks);
        Ok(archive)
    }
}
