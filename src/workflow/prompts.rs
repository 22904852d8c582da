//! 提示词

/// LLM 回答"不需要动画"时使用的标记
pub const NO_VISUALIZATION: &str = "NO_VISUALIZATION";

pub const TOPIC_BREAKDOWN: &str = "You split a learning topic into the smallest set of \
subtopics a student should study, in teaching order.

Rules:
- Return between 3 and 6 subtopics.
- One subtopic per line, numbered like `1. Slope`.
- No headings, no explanations, no extra text.";

const TEXT_CONTENT: &str = "You write short, focused learning material.

Format:
- Markdown headings (##, ###) and bullet points.
- One core explanation (1-2 sentences), the key points, one small example.
- At most 200 words. No filler.";

pub const VISUALIZATION: &str = "You decide whether a topic benefits from a short Manim animation \
and, if it does, write the animation.

Animate topics about structure, process or relationships: data structures, algorithms, \
functions and graphs, geometry, vectors, logic, step-by-step procedures. \
Do not animate topics that are mostly facts, vocabulary or prose.

If no animation is needed, answer exactly NO_VISUALIZATION.

Otherwise answer with one ```python fenced block containing a complete script:
- `from manim import *` and exactly one class inheriting from Scene with a construct() method.
- Use Text() for every label; never MathTex, Tex or anything needing LaTeX.
- Use Axes(axis_config={\"include_numbers\": False}) instead of NumberLine.
- Only basic shapes (Circle, Square, Rectangle, Line, Arrow, Dot, Polygon) and \
Create / Write / FadeIn / FadeOut / .animate animations.
- End with self.wait(1). Keep it under 30 seconds.";

/// 讲解文本的系统提示词，附带用户偏好
pub fn text_prompt(user_preferences: &str) -> String {
    let preferences = user_preferences.trim();
    if preferences.is_empty() {
        TEXT_CONTENT.to_string()
    } else {
        format!("{}\n\nUser Preferences: {}", TEXT_CONTENT, preferences)
    }
}

pub fn breakdown_user_message(topic: &str) -> String {
    format!("Break down this topic into learnable components: {}", topic)
}

pub fn text_user_message(topic: &str) -> String {
    format!("Create comprehensive learning content for this specific topic: {}", topic)
}

pub fn visualization_user_message(topic: &str, text_content: &str) -> String {
    format!(
        "Topic: \"{}\"\n\nText content:\n{}\n\nWould showing this be clearer than telling it? \
         If yes, write the Manim script; if not, answer {}.",
        topic, text_content, NO_VISUALIZATION
    )
}
