use super::{char_len, HierarchyPolicy, SectionTracker, SegmentationStrategy};
use crate::document::chunk::{Chunk, DocumentId, IdGenerator};
use crate::document::region::Region;
use tracing::debug;

/// Regions whose trimmed text is shorter than this are not emitted.
pub const MIN_REGION_CHARS: usize = 3;

/// One chunk per region, tagged with the section path seen so far.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticStrategy;

impl SegmentationStrategy for SemanticStrategy {
    fn segment(
        &self,
        document_id: &DocumentId,
        regions: &[Region],
        ids: &dyn IdGenerator,
    ) -> Vec<Chunk> {
        let mut sections = SectionTracker::new(HierarchyPolicy::Capped);
        let mut chunks = Vec::new();

        for region in regions {
            // Headings move the section path even when too short to emit
            if region.kind.is_heading() {
                sections.enter_heading(region);
            }

            let text = region.trimmed_text();
            if char_len(text) < MIN_REGION_CHARS {
                continue;
            }

            let chunk = Chunk::new(
                ids.next_id(),
                document_id.clone(),
                text,
                region.kind.into(),
                region.confidence,
            )
            .with_bounds(Some(region.bounds))
            .with_section(sections.current(), sections.hierarchy())
            .with_sequence_index(chunks.len());

            chunks.push(chunk);
        }

        debug!(
            "Semantic segmentation: {} regions -> {} chunks",
            regions.len(),
            chunks.len()
        );

        chunks
    }
}
