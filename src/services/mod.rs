pub mod block_store;
pub mod llm_service;
pub mod notebook_store;
pub mod visualization_service;

pub use block_store::{BlockArchive, BlockStore};
pub use llm_service::{ChatModel, LlmService};
pub use notebook_store::NotebookStore;
pub use visualization_service::{cleanup_old_files, ManimRenderer, RenderOutcome, VideoRenderer};
