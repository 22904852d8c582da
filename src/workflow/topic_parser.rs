//! 子主题列表解析

/// 去掉行首的编号和列表符号（`1.`、`-`、`*` 等）
fn strip_list_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '*' | ' '))
        .trim()
}

/// 解析 LLM 返回的主题拆解结果
///
/// 跳过空行和以 `#` / `*` 开头的行（标题、强调说明），
/// 其余每一行去掉编号后作为一个子主题
pub fn parse_breakdown_response(response: &str) -> Vec<String> {
    response
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('*'))
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析用户直接给出的子主题列表
///
/// 按行拆分；如果只有一行且含逗号，则按逗号拆分
pub fn parse_topics(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let topics: Vec<String> = input
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if topics.len() == 1 && topics[0].contains(',') {
        return topics[0]
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    topics
}
