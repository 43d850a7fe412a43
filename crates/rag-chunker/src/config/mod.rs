pub mod settings;

pub use settings::{ChunkStrategy, ChunkingConfig, LogFormat, LoggingConfig, Settings};
