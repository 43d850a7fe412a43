use super::{char_len, HierarchyPolicy, SectionTracker, SegmentationStrategy};
use crate::config::ChunkingConfig;
use crate::document::chunk::{Chunk, ContentKind, DocumentId, IdGenerator};
use crate::document::region::{Region, RegionKind};
use tracing::{debug, trace};

/// Merges runs of paragraphs; headings and tables always get a chunk of their own.
#[derive(Debug, Clone, Copy)]
pub struct LayoutStrategy {
    size: usize,
}

/// Paragraph regions waiting to be merged into one chunk.
struct PendingParagraphs<'a> {
    regions: Vec<&'a Region>,
    chars: usize,
}

impl<'a> PendingParagraphs<'a> {
    fn new() -> Self {
        Self {
            regions: Vec::new(),
            chars: 0,
        }
    }

    // Padding around a paragraph does not count toward the size.
    fn push(&mut self, region: &'a Region) {
        self.chars += char_len(region.trimmed_text());
        self.regions.push(region);
    }

    fn take(&mut self) -> Vec<&'a Region> {
        self.chars = 0;
        std::mem::take(&mut self.regions)
    }
}

impl LayoutStrategy {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.size)
    }

    fn flush(
        &self,
        pending: &mut PendingParagraphs<'_>,
        chunks: &mut Vec<Chunk>,
        sections: &SectionTracker,
        document_id: &DocumentId,
        ids: &dyn IdGenerator,
    ) {
        let paragraphs = pending.take();
        if paragraphs.is_empty() {
            return;
        }

        let content = paragraphs
            .iter()
            .map(|p| p.trimmed_text())
            .collect::<Vec<_>>()
            .join("\n");
        let confidence =
            paragraphs.iter().map(|p| p.confidence).sum::<f32>() / paragraphs.len() as f32;
        let bounds = match paragraphs.as_slice() {
            [single] => Some(single.bounds),
            _ => None,
        };

        let chunk = Chunk::new(
            ids.next_id(),
            document_id.clone(),
            content,
            ContentKind::Paragraph,
            confidence,
        )
        .with_bounds(bounds)
        .with_section(sections.current(), sections.hierarchy())
        .with_sequence_index(chunks.len());

        chunks.push(chunk);
    }
}

impl SegmentationStrategy for LayoutStrategy {
    fn segment(
        &self,
        document_id: &DocumentId,
        regions: &[Region],
        ids: &dyn IdGenerator,
    ) -> Vec<Chunk> {
        let mut sections = SectionTracker::new(HierarchyPolicy::Appending);
        let mut pending = PendingParagraphs::new();
        let mut chunks = Vec::new();

        for region in regions {
            match region.kind {
                RegionKind::Title | RegionKind::SectionHeader => {
                    self.flush(&mut pending, &mut chunks, &sections, document_id, ids);
                    sections.enter_heading(region);

                    if region.has_text() {
                        let chunk = Chunk::new(
                            ids.next_id(),
                            document_id.clone(),
                            region.trimmed_text(),
                            ContentKind::Heading,
                            region.confidence,
                        )
                        .with_bounds(Some(region.bounds))
                        .with_section(sections.current(), sections.hierarchy())
                        .with_sequence_index(chunks.len());
                        chunks.push(chunk);
                    }
                }
                RegionKind::Table => {
                    self.flush(&mut pending, &mut chunks, &sections, document_id, ids);

                    // Table text keeps its original layout, no trimming
                    if region.has_text() {
                        let chunk = Chunk::new(
                            ids.next_id(),
                            document_id.clone(),
                            region.raw_text(),
                            ContentKind::Table,
                            region.confidence,
                        )
                        .with_bounds(Some(region.bounds))
                        .with_section(sections.current(), sections.hierarchy())
                        .with_sequence_index(chunks.len());
                        chunks.push(chunk);
                    }
                }
                RegionKind::Paragraph | RegionKind::Unknown => {
                    if !region.has_text() {
                        continue;
                    }
                    pending.push(region);
                    if pending.chars > self.size {
                        self.flush(&mut pending, &mut chunks, &sections, document_id, ids);
                    }
                }
                RegionKind::ListItem
                | RegionKind::Figure
                | RegionKind::Header
                | RegionKind::Footer => {
                    trace!(
                        "Layout segmentation ignores {:?} region at position {}",
                        region.kind,
                        region.sequence_position
                    );
                }
            }
        }

        self.flush(&mut pending, &mut chunks, &sections, document_id, ids);

        debug!(
            "Layout segmentation: {} regions -> {} chunks (size={})",
            regions.len(),
            chunks.len(),
            self.size
        );

        chunks
    }
}
