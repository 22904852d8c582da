//! # Topic Learner
//!
//! 把一个学习主题拆成若干学习块（讲解文本 + Manim 动画），并生成练习 notebook 的 HTTP 服务
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `LlmService` - 调用 LLM 能力（`ChatModel`）
//! - `ManimRenderer` - 渲染动画能力（`VideoRenderer`）
//! - `BlockStore` / `NotebookStore` - 保存产物能力
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一个子主题"的完整处理流程
//! - `BlockFlow` - 流程编排（文本 → 动画判断 → 渲染重试）
//! - `build_playground` - 学习块 → notebook
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/learn_processor` - 主题拆解、并发处理、失败统计、保存
//!
//! ### ④ 接口层（Api）
//! - `api/` - axum 路由，把 `AppError` 映射成 HTTP 错误
//!
//! ## 模块结构

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::{router, AppState};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{LearnRequest, LearnResponse, LearningBlock, Notebook};
pub use orchestrator::LearnProcessor;
pub use services::{ChatModel, RenderOutcome, VideoRenderer};
pub use workflow::BlockFlow;
