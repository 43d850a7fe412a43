use crate::config::ChunkStrategy;
use crate::document::chunk::{Chunk, DocumentId};
use crate::document::region::BoundingBox;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key-value pair found by an upstream extractor; carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub row: u32,
    pub col: u32,
    pub text: String,
    #[serde(default = "default_span")]
    pub rowspan: u32,
    #[serde(default = "default_span")]
    pub colspan: u32,
}

/// Structured table from the table extractor; carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub table_id: String,
    pub page_number: u32,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

fn default_confidence() -> f32 {
    1.0
}

fn default_span() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: DocumentId,
    pub page_count: usize,
    pub chunk_count: usize,
    pub strategy: ChunkStrategy,
    pub has_tables: bool,
    pub processing_time_ms: u64,
    pub processed_at: DateTime<Utc>,
    pub key_value_pairs: Vec<KeyValuePair>,
    pub tables: Vec<ExtractedTable>,
}

/// Everything produced for one document, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub metadata: DocumentMetadata,
    pub chunks: Vec<Chunk>,
    pub raw_text: String,
}
