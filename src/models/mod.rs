pub mod learning_block;
pub mod notebook;
pub mod schema;

pub use learning_block::LearningBlock;
pub use notebook::{Cell, Notebook};
pub use schema::{ErrorResponse, HealthResponse, LearnRequest, LearnResponse, LearningBlockResponse};
