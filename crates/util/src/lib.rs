//! Small helpers shared by the registry, engine and CLI crates.

pub mod path_processing;
pub mod tree_paths;

pub use path_processing::{env_path_override, expand_tilde};
pub use tree_paths::{nest_at_path, path_segments};
