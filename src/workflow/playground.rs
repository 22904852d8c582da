//! 由学习块生成练习 notebook

use crate::models::{Cell, LearningBlock, Notebook};

/// 视频的访问路由前缀
pub const VISUALIZATION_ROUTE: &str = "/visualization";

/// 生成练习 notebook
///
/// 结构：一个总览 markdown 单元格，然后每个学习块各一个 markdown 讲解单元格
/// 和一个 code 练习单元格
pub fn build_playground(blocks: &[LearningBlock]) -> Notebook {
    let mut cells = Vec::with_capacity(blocks.len() * 2 + 1);

    let topics = blocks
        .iter()
        .map(|block| format!("- {}", block.topic))
        .collect::<Vec<_>>()
        .join("\n");
    cells.push(Cell::markdown(format!(
        "# Learning Module\n\nThis notebook contains learning components for the following topics:\n\n{}",
        topics
    )));

    for block in blocks {
        let mut text = format!("## Component {}: {}\n\n{}", block.id, block.topic, block.text_content);
        if let Some(path) = &block.visualization_path {
            text.push_str(&format!("\n\n[▶ Watch the animation]({}/{})", VISUALIZATION_ROUTE, path));
        }
        cells.push(Cell::markdown(text));

        cells.push(Cell::code(format!(
            "# TODO: Implement exercises for {}\n# Add your code here\n# Example: variable_name = 'hello'",
            block.topic
        )));
    }

    Notebook::new(cells)
}
