//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! api (HTTP 路由)
//!     ↓
//! orchestrator::LearnProcessor (处理一个主题 → Vec<LearningBlock>)
//!     ↓
//! workflow::BlockFlow (处理单个子主题)
//!     ↓
//! services (能力层：llm / render / store)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services
//! 2. **无业务细节**：只做调度、统计和保存

pub mod learn_processor;

pub use learn_processor::LearnProcessor;
