use anyhow::{Context, Result};
use clap::Parser;
use rag_chunker::config::{ChunkStrategy, Settings};
use rag_chunker::document::{DocumentInput, DocumentPipeline, UuidIdGenerator};
use rag_chunker::utils::init_logger;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "rag-chunker",
    version,
    about = "Layout-aware document chunking for RAG indexing"
)]
struct Args {
    /// Layout analysis JSON (document id, pages with regions, side data)
    input: PathBuf,

    /// Segmentation strategy: semantic, fixed or layout
    #[arg(long)]
    strategy: Option<ChunkStrategy>,

    /// Target chunk size in characters
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overlap between fixed-size chunks, as a fraction of chunk size
    #[arg(long)]
    overlap_ratio: Option<f32>,

    /// Segment pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(strategy) = args.strategy {
        settings.chunking.strategy = strategy;
    }
    if let Some(size) = args.chunk_size {
        settings.chunking.size = size;
    }
    if let Some(ratio) = args.overlap_ratio {
        settings.chunking.overlap_ratio = ratio;
    }
    if args.parallel {
        settings.chunking.parallel_pages = true;
    }
    settings.validate()?;

    init_logger(&settings.logging)?;
    info!("🚀 Starting rag-chunker v{}", env!("CARGO_PKG_VERSION"));

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let input: DocumentInput = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid document input in {}", args.input.display()))?;

    let pipeline = DocumentPipeline::new(settings.chunking.clone(), Arc::new(UuidIdGenerator))?;
    let processed = pipeline.process_default(input);

    let json = serde_json::to_string_pretty(&processed)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} chunks to {}", processed.chunks.len(), path.display());
        }
        None => println!("{}", json),
    }

    pipeline.metrics().log_summary();
    Ok(())
}
