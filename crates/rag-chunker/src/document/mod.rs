pub mod chunk;
pub mod chunker;
pub mod linkage;
pub mod metadata;
pub mod pipeline;
pub mod region;
pub mod sentence;
pub mod strategies;

pub use chunk::{
    Chunk, ChunkId, ContentKind, DocumentId, IdGenerator, SequentialIdGenerator, UuidIdGenerator,
};
pub use chunker::RegionChunker;
pub use linkage::link;
pub use metadata::{DocumentMetadata, ExtractedTable, KeyValuePair, ProcessedDocument, TableCell};
pub use pipeline::{DocumentInput, DocumentPipeline, PageRegions};
pub use region::{BoundingBox, Region, RegionKind};
pub use sentence::split_sentences;
