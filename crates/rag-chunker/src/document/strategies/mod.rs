pub mod fixed;
pub mod layout;
pub mod semantic;

pub use fixed::FixedSizeStrategy;
pub use layout::LayoutStrategy;
pub use semantic::SemanticStrategy;

use crate::document::chunk::{Chunk, DocumentId, IdGenerator};
use crate::document::region::{Region, RegionKind};

/// Section labels keep at most this many characters of the heading text.
pub const SECTION_LABEL_MAX_CHARS: usize = 50;

/// Deepest section hierarchy the semantic strategy keeps.
pub const MAX_SECTION_DEPTH: usize = 3;

/// One page worth of regions in, unlinked chunks out.
pub trait SegmentationStrategy {
    fn segment(
        &self,
        document_id: &DocumentId,
        regions: &[Region],
        ids: &dyn IdGenerator,
    ) -> Vec<Chunk>;
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Label for a heading: the first 50 characters of its trimmed text, or nothing
/// for an empty heading. Padded and unpadded headings get the same label.
pub fn section_label(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(SECTION_LABEL_MAX_CHARS).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HierarchyPolicy {
    /// Titles reset the path; headers are capped at `MAX_SECTION_DEPTH`.
    Capped,
    /// Every heading appends.
    Appending,
}

/// Tracks the current section and its ancestor path while walking regions.
#[derive(Debug, Clone)]
pub(crate) struct SectionTracker {
    policy: HierarchyPolicy,
    current: Option<String>,
    hierarchy: Vec<String>,
}

impl SectionTracker {
    pub(crate) fn new(policy: HierarchyPolicy) -> Self {
        Self {
            policy,
            current: None,
            hierarchy: Vec::new(),
        }
    }

    pub(crate) fn enter_heading(&mut self, region: &Region) {
        let label = section_label(region.raw_text());
        self.current = label.clone();

        match (self.policy, region.kind) {
            (HierarchyPolicy::Capped, RegionKind::Title) => {
                self.hierarchy.clear();
                self.hierarchy.extend(label);
            }
            (HierarchyPolicy::Capped, _) => {
                if let Some(label) = label {
                    // Keeps the top two ancestors and replaces the rest.
                    if self.hierarchy.len() + 1 > MAX_SECTION_DEPTH {
                        self.hierarchy.truncate(MAX_SECTION_DEPTH - 1);
                    }
                    self.hierarchy.push(label);
                }
            }
            (HierarchyPolicy::Appending, _) => {
                self.hierarchy.extend(label);
            }
        }
    }

    pub(crate) fn current(&self) -> Option<String> {
        self.current.clone()
    }

    pub(crate) fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }
}
