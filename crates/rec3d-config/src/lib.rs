//! Engine configuration loading and parsing.

pub mod loader;
pub mod parser;

pub use loader::{load_engine_config, DEFAULT_CONFIG_PATH};
pub use parser::{parse_engine_config, parse_reals, EngineConfig};
