pub mod logging;

pub use logging::{log_learn_complete, log_startup, tail_text, truncate_text};
