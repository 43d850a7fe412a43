use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::document::chunk::{Chunk, DocumentId, IdGenerator};
use crate::document::region::Region;
use crate::document::strategies::{
    FixedSizeStrategy, LayoutStrategy, SegmentationStrategy, SemanticStrategy,
};
use std::sync::Arc;
use tracing::debug;

/// Turns an ordered region list into unlinked chunks with the chosen strategy.
#[derive(Clone)]
pub struct RegionChunker {
    config: ChunkingConfig,
    ids: Arc<dyn IdGenerator>,
}

impl RegionChunker {
    pub fn new(config: ChunkingConfig, ids: Arc<dyn IdGenerator>) -> Self {
        Self { config, ids }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Segment one page of regions. Linkage fields stay empty until `link`.
    pub fn segment(
        &self,
        document_id: &DocumentId,
        regions: &[Region],
        strategy: ChunkStrategy,
    ) -> Vec<Chunk> {
        if regions.is_empty() {
            return Vec::new();
        }

        debug!(
            "Segmenting {} regions for {} with {} strategy",
            regions.len(),
            document_id,
            strategy
        );

        let ids = self.ids.as_ref();
        match strategy {
            ChunkStrategy::Semantic => SemanticStrategy.segment(document_id, regions, ids),
            ChunkStrategy::Fixed => {
                FixedSizeStrategy::from_config(&self.config).segment(document_id, regions, ids)
            }
            ChunkStrategy::Layout => {
                LayoutStrategy::from_config(&self.config).segment(document_id, regions, ids)
            }
        }
    }
}
