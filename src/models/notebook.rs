//! Jupyter notebook (nbformat 4) 数据结构

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 2;

/// Notebook 文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: NotebookMetadata::default(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    pub fn markdown_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| matches!(c, Cell::Markdown { .. }))
    }

    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| matches!(c, Cell::Code { .. }))
    }
}

/// 单元格，按 `cell_type` 区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        source: Vec<String>,
        #[serde(default)]
        metadata: Map<String, JsonValue>,
    },
    Code {
        source: Vec<String>,
        #[serde(default)]
        metadata: Map<String, JsonValue>,
        execution_count: Option<u32>,
        #[serde(default)]
        outputs: Vec<JsonValue>,
    },
}

impl Cell {
    pub fn markdown(text: impl Into<String>) -> Self {
        Cell::Markdown {
            source: vec![text.into()],
            metadata: Map::new(),
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Cell::Code {
            source: vec![text.into()],
            metadata: Map::new(),
            execution_count: None,
            outputs: Vec::new(),
        }
    }

    /// 拼接后的源码文本
    pub fn text(&self) -> String {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } => source.concat(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
}

impl Default for NotebookMetadata {
    fn default() -> Self {
        Self {
            kernelspec: KernelSpec {
                display_name: "Python 3".to_string(),
                language: "python".to_string(),
                name: "python3".to_string(),
            },
            language_info: LanguageInfo {
                name: "python".to_string(),
                version: "3.8.0".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    pub version: String,
}
