use crate::document::region::{BoundingBox, RegionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

macro_rules! impl_string_id {
    ($t:ty) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $t {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

impl_string_id!(ChunkId);
impl_string_id!(DocumentId);

/// Source of chunk identifiers, handed to the chunker explicitly.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ChunkId;
}

/// Random ids of the form `chunk_<12 hex>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> ChunkId {
        let hex = Uuid::new_v4().simple().to_string();
        ChunkId(format!("chunk_{}", &hex[..12]))
    }
}

/// Deterministic counter-based ids: `<prefix>_0`, `<prefix>_1`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> ChunkId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        ChunkId(format!("{}_{}", self.prefix, n))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Paragraph,
    Heading,
    List,
    Table,
    Figure,
    Header,
    Footer,
}

impl From<RegionKind> for ContentKind {
    fn from(kind: RegionKind) -> Self {
        match kind {
            RegionKind::Paragraph => Self::Paragraph,
            RegionKind::Title | RegionKind::SectionHeader => Self::Heading,
            RegionKind::ListItem => Self::List,
            RegionKind::Table => Self::Table,
            RegionKind::Figure => Self::Figure,
            RegionKind::Header => Self::Header,
            RegionKind::Footer => Self::Footer,
            RegionKind::Unknown => Self::Paragraph,
        }
    }
}

/// A retrieval unit plus the linkage needed to rebuild its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub document_id: DocumentId,

    // Position
    pub sequence_index: usize,
    pub total_count: usize,
    pub page_number: u32,

    // Content
    pub content: String,
    pub content_kind: ContentKind,
    pub confidence: f32,
    pub bounds: Option<BoundingBox>,

    // Linkage
    pub prev_id: Option<ChunkId>,
    pub next_id: Option<ChunkId>,
    pub parent_section: Option<String>,
    pub section_hierarchy: Vec<String>,
    pub sibling_ids: Vec<ChunkId>,
    pub overlap_with_prev: Option<String>,
    pub overlap_with_next: Option<String>,
    pub is_continuation: bool,
    pub continues_to_next: bool,
}

impl Chunk {
    /// New unlinked chunk on page 1; the pipeline assigns the real page.
    pub fn new(
        id: ChunkId,
        document_id: DocumentId,
        content: impl Into<String>,
        content_kind: ContentKind,
        confidence: f32,
    ) -> Self {
        Self {
            id,
            document_id,
            sequence_index: 0,
            total_count: 0,
            page_number: 1,
            content: content.into(),
            content_kind,
            confidence,
            bounds: None,
            prev_id: None,
            next_id: None,
            parent_section: None,
            section_hierarchy: Vec::new(),
            sibling_ids: Vec::new(),
            overlap_with_prev: None,
            overlap_with_next: None,
            is_continuation: false,
            continues_to_next: false,
        }
    }

    pub fn with_bounds(mut self, bounds: Option<BoundingBox>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_section(mut self, parent_section: Option<String>, hierarchy: &[String]) -> Self {
        self.parent_section = parent_section;
        self.section_hierarchy = hierarchy.to_vec();
        self
    }

    pub fn with_sequence_index(mut self, sequence_index: usize) -> Self {
        self.sequence_index = sequence_index;
        self
    }

    /// Sibling grouping key; chunks outside any section share "root".
    pub fn section_key(&self) -> &str {
        self.parent_section.as_deref().unwrap_or(ROOT_SECTION)
    }
}

pub const ROOT_SECTION: &str = "root";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_mapping() {
        assert_eq!(ContentKind::from(RegionKind::Title), ContentKind::Heading);
        assert_eq!(ContentKind::from(RegionKind::SectionHeader), ContentKind::Heading);
        assert_eq!(ContentKind::from(RegionKind::ListItem), ContentKind::List);
        assert_eq!(ContentKind::from(RegionKind::Unknown), ContentKind::Paragraph);
        assert_eq!(ContentKind::from(RegionKind::Footer), ContentKind::Footer);
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidIdGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("chunk_"));
        assert_eq!(a.as_str().len(), "chunk_".len() + 12);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("c");
        assert_eq!(ids.next_id(), ChunkId::from("c_0"));
        assert_eq!(ids.next_id(), ChunkId::from("c_1"));
    }

    #[test]
    fn test_section_key_defaults_to_root() {
        let chunk = Chunk::new(
            ChunkId::from("a"),
            DocumentId::from("doc"),
            "text",
            ContentKind::Paragraph,
            1.0,
        );
        assert_eq!(chunk.section_key(), ROOT_SECTION);
    }
}
