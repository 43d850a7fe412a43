pub mod config;
pub mod document;
pub mod utils;

pub use config::{ChunkStrategy, ChunkingConfig, Settings};
pub use document::{
    link, Chunk, DocumentInput, DocumentPipeline, ProcessedDocument, Region, RegionChunker,
};
pub use utils::error::ChunkerError;
