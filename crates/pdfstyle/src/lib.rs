//! Turns a flat, unordered collection of positioned text runs into
//! normalized, classified text blocks plus a per-document statistical
//! summary of the distinct visual text styles present.
//!
//! # Pipeline
//!
//! ```text
//! pages  ->  Strategy::extract_text  ->  blocks (+ spans)
//!                                          |
//!                                          v  (analysis strategy)
//!                              analysis::analyze_spans -> AnalysisReport
//!                                          |
//!                                          v  (on demand)
//!                        highlight::create_highlighted_document
//! ```
//!
//! Persistence, presentation, and configuration are external collaborators:
//! this crate consumes [`source::Page`] values produced elsewhere and hands
//! back plain data (and, for highlighting, a file at a caller-chosen path).

use thiserror::Error;

pub mod analysis;
pub mod extract;
pub mod highlight;
pub mod source;
pub mod types;

pub use extract::{Strategy, STRATEGY_NAMES};
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfStyleError {
    /// Unknown or unsupported strategy name. Fatal, raised at construction.
    #[error("unknown extraction strategy `{requested}` (available: {available})")]
    UnknownStrategy { requested: String, available: String },
    /// Malformed page content. The page is unusable; the caller decides
    /// whether to abort the document or skip the page.
    #[error("extraction failed on page {page}: {reason}")]
    Extraction { page: u32, reason: String },
    /// Underlying document unreadable or unwritable.
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Drives one extraction strategy over a document's pages.
///
/// Stateless and cheap to share: all accumulation lives inside a single
/// [`process`](DocumentProcessor::process) call, so one processor can serve
/// any number of documents sequentially, and independent documents can be
/// processed concurrently with independent calls.
#[derive(Debug, Clone, Copy)]
pub struct DocumentProcessor {
    strategy: Strategy,
}

/// Everything extracted from one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Ordered blocks stamped with their 1-based page number.
    pub blocks: Vec<Block>,
    /// Style report; present only for the analysis strategy when at least
    /// one span was retained. `report.common_styles` is the ranked
    /// [`StyleStatistic`] list fed to the highlight mapper.
    pub report: Option<AnalysisReport>,
}

impl DocumentProcessor {
    /// Construct from a configuration name.
    ///
    /// Unknown names fail here, not at processing time.
    pub fn new(strategy_name: &str) -> Result<Self, PdfStyleError> {
        Ok(DocumentProcessor {
            strategy: Strategy::from_name(strategy_name)?,
        })
    }

    pub fn with_strategy(strategy: Strategy) -> Self {
        DocumentProcessor { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Process a document's pages start-to-finish.
    ///
    /// Pages are extracted in the order given; a page the strategy cannot
    /// read aborts the call with [`PdfStyleError::Extraction`] (callers
    /// preferring skip-over-abort can drive
    /// [`Strategy::extract_text`] page by page instead).
    pub fn process(&self, pages: &[source::Page]) -> Result<ProcessedDocument, PdfStyleError> {
        let mut blocks = Vec::new();
        let mut spans = Vec::new();

        for page in pages {
            let extraction = self.strategy.extract_text(page)?;
            blocks.extend(extraction.blocks);
            spans.extend(extraction.spans);
        }

        let report = if self.strategy == Strategy::Analysis && !spans.is_empty() {
            Some(analysis::analyze_spans(&spans))
        } else {
            None
        };

        Ok(ProcessedDocument { blocks, report })
    }
}

/// One-shot convenience wrapper: look up the strategy and process `pages`.
pub fn process(
    pages: &[source::Page],
    strategy_name: &str,
) -> Result<ProcessedDocument, PdfStyleError> {
    DocumentProcessor::new(strategy_name)?.process(pages)
}
