pub mod block_flow;
pub mod playground;
pub mod prompts;
pub mod topic_parser;

pub use block_flow::{BlockFlow, BlockFlowSettings};
pub use playground::build_playground;
pub use topic_parser::{parse_breakdown_response, parse_topics};
