use crate::config::{ChunkStrategy, ChunkingConfig};
use crate::document::chunk::{Chunk, ContentKind, DocumentId, IdGenerator};
use crate::document::chunker::RegionChunker;
use crate::document::linkage::link;
use crate::document::metadata::{DocumentMetadata, ExtractedTable, KeyValuePair, ProcessedDocument};
use crate::document::region::Region;
use crate::utils::error::ChunkerError;
use crate::utils::metrics::{Metrics, Timer};
use chrono::Utc;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRegions {
    pub page_number: u32,
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// Layout analysis output for one document, as handed over by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub document_id: DocumentId,
    #[serde(default)]
    pub pages: Vec<PageRegions>,
    #[serde(default)]
    pub key_value_pairs: Vec<KeyValuePair>,
    #[serde(default)]
    pub tables: Vec<ExtractedTable>,
}

/// Drives segmentation page by page, then links the whole document once.
pub struct DocumentPipeline {
    chunker: RegionChunker,
    metrics: Metrics,
    pool: Option<ThreadPool>,
}

impl DocumentPipeline {
    pub fn new(config: ChunkingConfig, ids: Arc<dyn IdGenerator>) -> Result<Self, ChunkerError> {
        Self::with_metrics(config, ids, Metrics::new())
    }

    pub fn with_metrics(
        config: ChunkingConfig,
        ids: Arc<dyn IdGenerator>,
        metrics: Metrics,
    ) -> Result<Self, ChunkerError> {
        let pool = if config.parallel_pages {
            // 0 lets rayon pick the thread count
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("rag-chunker-{}", i))
                .build()?;
            debug!("Page worker pool ready with {} threads", pool.current_num_threads());
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            chunker: RegionChunker::new(config, ids),
            metrics,
            pool,
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn config(&self) -> &ChunkingConfig {
        self.chunker.config()
    }

    /// Process with the configured default strategy.
    pub fn process_default(&self, input: DocumentInput) -> ProcessedDocument {
        let strategy = self.chunker.config().strategy;
        self.process(input, strategy)
    }

    pub fn process(&self, mut input: DocumentInput, strategy: ChunkStrategy) -> ProcessedDocument {
        let timer = Timer::new();
        info!(
            "📄 Processing document {} ({} pages, {} strategy)",
            input.document_id,
            input.pages.len(),
            strategy
        );

        input.pages.sort_by_key(|page| page.page_number);
        for page in &mut input.pages {
            page.regions.sort_by_key(|region| region.sequence_position);
        }

        let document_id = &input.document_id;
        let per_page: Vec<Vec<Chunk>> = match &self.pool {
            Some(pool) => pool.install(|| {
                input
                    .pages
                    .par_iter()
                    .map(|page| self.segment_page(document_id, page, strategy))
                    .collect()
            }),
            None => input
                .pages
                .iter()
                .map(|page| self.segment_page(document_id, page, strategy))
                .collect(),
        };

        for (page, chunks) in input.pages.iter().zip(&per_page) {
            if chunks.is_empty() {
                warn!(
                    "Page {} of document {} produced no chunks",
                    page.page_number, document_id
                );
                self.metrics.increment_empty_pages();
            }
        }

        let chunks = link(per_page.into_iter().flatten().collect());
        let raw_text = raw_text(&input.pages);
        let has_tables = !input.tables.is_empty()
            || chunks.iter().any(|chunk| chunk.content_kind == ContentKind::Table);

        let elapsed = timer.elapsed();
        self.metrics.increment_documents_processed();
        self.metrics.add_pages_processed(input.pages.len() as u64);
        self.metrics.add_chunks_created(chunks.len() as u64);
        self.metrics.add_processing_time(elapsed);

        info!(
            "✅ Document {} chunked into {} chunks in {}ms",
            input.document_id,
            chunks.len(),
            elapsed.as_millis()
        );

        ProcessedDocument {
            metadata: DocumentMetadata {
                page_count: input.pages.len(),
                chunk_count: chunks.len(),
                strategy,
                has_tables,
                processing_time_ms: elapsed.as_millis() as u64,
                processed_at: Utc::now(),
                key_value_pairs: input.key_value_pairs,
                tables: input.tables,
                document_id: input.document_id,
            },
            chunks,
            raw_text,
        }
    }

    fn segment_page(
        &self,
        document_id: &DocumentId,
        page: &PageRegions,
        strategy: ChunkStrategy,
    ) -> Vec<Chunk> {
        let mut chunks = self.chunker.segment(document_id, &page.regions, strategy);
        for chunk in &mut chunks {
            chunk.page_number = page.page_number;
        }
        chunks
    }
}

/// Region text per page joined by newlines, pages separated by a blank line.
fn raw_text(pages: &[PageRegions]) -> String {
    pages
        .iter()
        .map(|page| {
            page.regions
                .iter()
                .map(Region::trimmed_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::chunk::SequentialIdGenerator;
    use crate::document::metadata::TableCell;
    use crate::document::region::RegionKind;

    fn page(page_number: u32, regions: Vec<Region>) -> PageRegions {
        PageRegions {
            page_number,
            regions,
        }
    }

    fn input(pages: Vec<PageRegions>) -> DocumentInput {
        DocumentInput {
            document_id: DocumentId::from("doc-1"),
            pages,
            key_value_pairs: Vec::new(),
            tables: Vec::new(),
        }
    }

    fn two_pages() -> DocumentInput {
        input(vec![
            page(
                1,
                vec![
                    Region::new(RegionKind::SectionHeader, "Scope"),
                    Region::new(RegionKind::Paragraph, "First page body."),
                ],
            ),
            page(
                2,
                vec![
                    Region::new(RegionKind::Paragraph, "Second page body."),
                    Region::new(RegionKind::Table, "a|b"),
                ],
            ),
        ])
    }

    fn pipeline(config: ChunkingConfig) -> DocumentPipeline {
        DocumentPipeline::new(config, Arc::new(SequentialIdGenerator::new("c"))).unwrap()
    }

    #[test]
    fn test_links_across_pages() {
        let doc = pipeline(ChunkingConfig::default()).process(two_pages(), ChunkStrategy::Semantic);

        assert_eq!(doc.chunks.len(), 4);
        assert_eq!(doc.metadata.chunk_count, 4);
        assert_eq!(doc.metadata.page_count, 2);

        let pages: Vec<u32> = doc.chunks.iter().map(|c| c.page_number).collect();
        assert_eq!(pages, vec![1, 1, 2, 2]);

        for (i, chunk) in doc.chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
            assert_eq!(chunk.total_count, 4);
        }
        assert_eq!(doc.chunks[1].next_id.as_ref(), Some(&doc.chunks[2].id));
        assert_eq!(doc.chunks[2].prev_id.as_ref(), Some(&doc.chunks[1].id));

        // each page is segmented on its own, so page 2 starts outside any section
        assert_eq!(doc.chunks[1].parent_section.as_deref(), Some("Scope"));
        assert_eq!(doc.chunks[2].parent_section, None);
        assert_eq!(doc.chunks[2].sibling_ids, vec![doc.chunks[3].id.clone()]);
    }

    #[test]
    fn test_siblings_group_across_pages() {
        let doc = pipeline(ChunkingConfig::default()).process(
            input(vec![
                page(
                    1,
                    vec![
                        Region::new(RegionKind::SectionHeader, "Terms"),
                        Region::new(RegionKind::Paragraph, "Clause one."),
                    ],
                ),
                page(
                    2,
                    vec![
                        Region::new(RegionKind::SectionHeader, "Terms"),
                        Region::new(RegionKind::Paragraph, "Clause two."),
                    ],
                ),
            ]),
            ChunkStrategy::Semantic,
        );

        assert_eq!(doc.chunks.len(), 4);
        let last = &doc.chunks[3];
        assert_eq!(last.page_number, 2);
        assert_eq!(last.sibling_ids.len(), 3);
        assert!(last.sibling_ids.contains(&doc.chunks[1].id));
    }

    #[test]
    fn test_regions_sorted_by_position() {
        let doc = pipeline(ChunkingConfig::default()).process(
            input(vec![page(
                1,
                vec![
                    Region::new(RegionKind::Paragraph, "Second.").at_position(2),
                    Region::new(RegionKind::Paragraph, "First.").at_position(1),
                    Region::new(RegionKind::Paragraph, "Also second.").at_position(2),
                ],
            )]),
            ChunkStrategy::Semantic,
        );

        let contents: Vec<&str> = doc.chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["First.", "Second.", "Also second."]);
        assert_eq!(doc.raw_text, "First.\nSecond.\nAlso second.");
    }

    #[test]
    fn test_pages_concatenated_in_page_order() {
        let doc = pipeline(ChunkingConfig::default()).process(
            input(vec![
                page(2, vec![Region::new(RegionKind::Paragraph, "Second page.")]),
                page(1, vec![Region::new(RegionKind::Paragraph, "First page.")]),
            ]),
            ChunkStrategy::Semantic,
        );

        let pages: Vec<u32> = doc.chunks.iter().map(|c| c.page_number).collect();
        assert_eq!(pages, vec![1, 2]);
        assert_eq!(doc.chunks[0].content, "First page.");
        assert_eq!(doc.chunks[0].sequence_index, 0);
        assert_eq!(doc.chunks[0].next_id.as_ref(), Some(&doc.chunks[1].id));
        assert_eq!(doc.raw_text, "First page.\n\nSecond page.");
    }

    #[test]
    fn test_raw_text_and_tables() {
        let doc = pipeline(ChunkingConfig::default()).process(two_pages(), ChunkStrategy::Semantic);

        assert_eq!(
            doc.raw_text,
            "Scope\nFirst page body.\n\nSecond page body.\na|b"
        );
        assert!(doc.metadata.has_tables);
        assert_eq!(doc.metadata.strategy, ChunkStrategy::Semantic);
    }

    #[test]
    fn test_side_data_passes_through() {
        let mut doc_input = input(vec![page(1, vec![Region::new(RegionKind::Paragraph, "Body text.")])]);
        doc_input.key_value_pairs.push(KeyValuePair {
            key: "Invoice".to_string(),
            value: "42".to_string(),
            confidence: 0.9,
            page_number: Some(1),
            bounds: None,
        });
        doc_input.tables.push(ExtractedTable {
            table_id: "t1".to_string(),
            page_number: 1,
            rows: 1,
            cols: 1,
            cells: vec![TableCell {
                row: 0,
                col: 0,
                text: "x".to_string(),
                rowspan: 1,
                colspan: 1,
            }],
            headers: None,
            confidence: 1.0,
            bounds: None,
        });

        let doc = pipeline(ChunkingConfig::default()).process(doc_input, ChunkStrategy::Semantic);

        assert_eq!(doc.metadata.key_value_pairs.len(), 1);
        assert_eq!(doc.metadata.key_value_pairs[0].value, "42");
        assert_eq!(doc.metadata.tables.len(), 1);
        assert!(doc.metadata.has_tables);
    }

    #[test]
    fn test_empty_pages_counted() {
        let pipeline = pipeline(ChunkingConfig::default());
        let doc = pipeline.process(
            input(vec![
                page(1, vec![]),
                page(2, vec![Region::new(RegionKind::Paragraph, "Only page with text.")]),
            ]),
            ChunkStrategy::Semantic,
        );

        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].page_number, 2);
        assert_eq!(pipeline.metrics().get_empty_pages(), 1);
        assert_eq!(pipeline.metrics().get_pages_processed(), 2);
        assert_eq!(pipeline.metrics().get_documents_processed(), 1);
        assert_eq!(pipeline.metrics().get_chunks_created(), 1);
    }

    #[test]
    fn test_empty_document() {
        let doc = pipeline(ChunkingConfig::default()).process(input(vec![]), ChunkStrategy::Layout);

        assert!(doc.chunks.is_empty());
        assert_eq!(doc.raw_text, "");
        assert!(!doc.metadata.has_tables);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<PageRegions> = (1..=8)
            .map(|n| {
                page(
                    n,
                    vec![
                        Region::new(RegionKind::SectionHeader, format!("Section {}", n)),
                        Region::new(RegionKind::Paragraph, format!("Body of page {}.", n)),
                    ],
                )
            })
            .collect();

        let sequential = pipeline(ChunkingConfig::default())
            .process(input(pages.clone()), ChunkStrategy::Semantic);
        let parallel = pipeline(ChunkingConfig {
            parallel_pages: true,
            worker_threads: 4,
            ..ChunkingConfig::default()
        })
        .process(input(pages), ChunkStrategy::Semantic);

        assert_eq!(sequential.chunks.len(), parallel.chunks.len());
        for (a, b) in sequential.chunks.iter().zip(&parallel.chunks) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.page_number, b.page_number);
            assert_eq!(a.sequence_index, b.sequence_index);
            assert_eq!(a.parent_section, b.parent_section);
            assert_eq!(a.sibling_ids.len(), b.sibling_ids.len());
        }
        assert_eq!(sequential.raw_text, parallel.raw_text);
    }

    #[test]
    fn test_default_strategy_from_config() {
        let doc = pipeline(ChunkingConfig {
            strategy: ChunkStrategy::Layout,
            ..ChunkingConfig::default()
        })
        .process_default(two_pages());

        assert_eq!(doc.metadata.strategy, ChunkStrategy::Layout);
    }
}
