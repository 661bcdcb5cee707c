//! The extraction-strategy family: four interchangeable ways of turning a
//! page's raw content into ordered, normalized [`Block`]s.
//!
//! Strategies are a closed set behind one capability:
//!
//! ```text
//! Page -> Strategy::extract_text -> PageExtraction { blocks, spans }
//! ```
//!
//! Only the analysis strategy retains spans; the other variants leave the
//! span list empty. All variants share the same text cleaning, block
//! classification, and color normalization rules.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::analysis::{group_into_lines, DEFAULT_Y_TOLERANCE};
use crate::source::{Page, PageContent, RawBlock, RawSpan, RawTextBlock, RawWord};
use crate::types::{BBox, Block, BlockType, TextLine, TextSpan};
use crate::PdfStyleError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Font attributes assumed for shapes that carry no font metadata.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_FONT_NAME: &str = "default";
pub const DEFAULT_FONT_COLOR: &str = "#000000";

/// Text below this fraction of the page height is footnote territory.
const FOOTNOTE_REGION_START: f32 = 0.85;
/// Maximum font size for footnote classification.
const FOOTNOTE_MAX_SIZE: f32 = 9.0;
/// Minimum font size for headline classification.
const HEADLINE_MIN_SIZE: f32 = 14.0;

/// Vertical displacement from the open block's top that starts a new block
/// in the word-accumulation strategy.
const WORD_BLOCK_Y_SPLIT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// The closed set of extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Reads the structured span tree; one block per source block.
    Structured,
    /// Consumes pre-segmented (bbox, text) blocks as-is.
    Blocks,
    /// Accumulates flat words into blocks by block number and y-position.
    Words,
    /// Reads the span tree, retains every span, one block per grouped line.
    Analysis,
}

/// Every strategy name accepted by [`Strategy::from_name`].
pub const STRATEGY_NAMES: &[&str] = &["structured", "blocks", "words", "analysis"];

impl Strategy {
    /// Look up a strategy by its configuration name.
    ///
    /// An unknown name is a configuration error listing the requested and
    /// available names.
    pub fn from_name(name: &str) -> Result<Self, PdfStyleError> {
        match name {
            "structured" => Ok(Strategy::Structured),
            "blocks" => Ok(Strategy::Blocks),
            "words" => Ok(Strategy::Words),
            "analysis" => Ok(Strategy::Analysis),
            _ => Err(PdfStyleError::UnknownStrategy {
                requested: name.to_string(),
                available: STRATEGY_NAMES.join(", "),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Structured => "structured",
            Strategy::Blocks => "blocks",
            Strategy::Words => "words",
            Strategy::Analysis => "analysis",
        }
    }

    /// Extract ordered blocks from one page.
    ///
    /// A page whose content shape does not match the strategy is an
    /// extraction failure for that page; the caller decides whether to
    /// abort or skip.
    pub fn extract_text(&self, page: &Page) -> Result<PageExtraction, PdfStyleError> {
        match (self, &page.content) {
            (Strategy::Structured, PageContent::Structured(blocks)) => {
                Ok(PageExtraction::blocks_only(extract_structured(page, blocks)?))
            }
            (Strategy::Blocks, PageContent::Blocks(blocks)) => {
                Ok(PageExtraction::blocks_only(extract_blocks(page, blocks)))
            }
            (Strategy::Words, PageContent::Words(words)) => {
                Ok(PageExtraction::blocks_only(extract_words(page, words)))
            }
            (Strategy::Analysis, PageContent::Structured(blocks)) => {
                Ok(extract_analysis(page, blocks))
            }
            (strategy, content) => Err(PdfStyleError::Extraction {
                page: page.number,
                reason: format!(
                    "strategy `{}` cannot read `{}` page content",
                    strategy.name(),
                    content.shape_name()
                ),
            }),
        }
    }
}

/// The output of one strategy run over one page.
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub blocks: Vec<Block>,
    /// Raw spans retained for later style aggregation (analysis only).
    pub spans: Vec<TextSpan>,
}

impl PageExtraction {
    fn blocks_only(blocks: Vec<Block>) -> Self {
        PageExtraction {
            blocks,
            spans: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared rules
// ---------------------------------------------------------------------------

/// Classify a block from its representative font size and vertical position.
///
/// Fixed thresholds: footnotes sit in the bottom 15% of the page at size 9
/// or below; size 14 and above is a headline; everything else is body.
pub fn classify_block_type(font_size: f32, y0: f32, page_height: f32) -> BlockType {
    if y0 > page_height * FOOTNOTE_REGION_START && font_size <= FOOTNOTE_MAX_SIZE {
        BlockType::Footnote
    } else if font_size >= HEADLINE_MIN_SIZE {
        BlockType::Headline
    } else {
        BlockType::Body
    }
}

/// Normalize a packed sRGB color value to a `#rrggbb` string.
///
/// Absent or zero means black.
pub fn color_to_hex(color: Option<u32>) -> String {
    match color {
        None | Some(0) => DEFAULT_FONT_COLOR.to_string(),
        Some(value) => format!("#{:06x}", value & 0xFF_FFFF),
    }
}

/// Clean up extracted text artifacts.
///
/// Applies, in order: unicode NFC normalization, doubled-character collapse
/// (`aabb` -> `ab`), period-run collapse, whitespace-run collapse,
/// Roman-numeral dot normalization, and a final trim.
pub fn clean_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    result = collapse_doubled(&result);

    static RE_DOTS: OnceLock<Regex> = OnceLock::new();
    let re_dots = RE_DOTS.get_or_init(|| Regex::new(r"\.{2,}").unwrap());
    result = re_dots.replace_all(&result, ".").to_string();

    static RE_SPACE: OnceLock<Regex> = OnceLock::new();
    let re_space = RE_SPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    result = re_space.replace_all(&result, " ").to_string();

    static RE_ROMAN: OnceLock<Regex> = OnceLock::new();
    let re_roman = RE_ROMAN.get_or_init(|| Regex::new(r"([IVX]+)\.+").unwrap());
    result = re_roman.replace_all(&result, "$1.").to_string();

    result.trim().to_string()
}

/// Collapse non-overlapping doubled character pairs: `aa` -> `a`,
/// `aaa` -> `aa`.
///
/// Roman-numeral letters are exempt so that legitimate numerals like `II`
/// or `XX` survive the pass (they are repaired, not produced, by the
/// doubling artifact this targets).
fn collapse_doubled(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        out.push(chars[i]);
        let doubled = i + 1 < chars.len() && chars[i + 1] == chars[i];
        if doubled && !matches!(chars[i], 'I' | 'V' | 'X') {
            i += 2;
        } else {
            i += 1;
        }
    }
    out
}

/// Reading order for top-level blocks: y0 ascending, then x0 ascending.
fn reading_order(a: &BBox, b: &BBox) -> Ordering {
    a.y0.partial_cmp(&b.y0)
        .unwrap_or(Ordering::Equal)
        .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
}

/// Convert a raw structured span into a [`TextSpan`], decoding font flags
/// and normalizing the color.
pub(crate) fn span_from_raw(raw: &RawSpan, page_number: u32) -> TextSpan {
    TextSpan {
        text: raw.text.clone(),
        bbox: raw.bbox,
        font_name: raw.font_name.clone(),
        font_size: raw.font_size,
        font_color: color_to_hex(raw.color),
        is_bold: raw.flags.is_bold(),
        is_italic: raw.flags.is_italic(),
        is_underlined: raw.flags.is_underlined(),
        page_number,
    }
}

// ---------------------------------------------------------------------------
// Structured-tree variant
// ---------------------------------------------------------------------------

fn extract_structured(page: &Page, blocks: &[RawBlock]) -> Result<Vec<Block>, PdfStyleError> {
    let mut ordered: Vec<&RawBlock> = blocks.iter().collect();
    ordered.sort_by(|a, b| reading_order(&a.bbox, &b.bbox));

    let mut out = Vec::new();
    for raw in ordered {
        // Non-text blocks arrive without line data.
        if raw.lines.is_empty() {
            continue;
        }

        let joined = raw
            .lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.trim().is_empty() {
            continue;
        }

        // Representative font attributes come from the first span only.
        let first = raw
            .lines
            .first()
            .and_then(|line| line.spans.first())
            .ok_or_else(|| PdfStyleError::Extraction {
                page: page.number,
                reason: "structured block has a line without spans".to_string(),
            })?;

        out.push(Block {
            text_content: clean_text(&joined),
            bbox: raw.bbox,
            font_size: first.font_size,
            font_name: first.font_name.clone(),
            font_color: color_to_hex(first.color),
            block_type: classify_block_type(first.font_size, raw.bbox.y0, page.height),
            page_number: page.number,
        });
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Flat-block variant
// ---------------------------------------------------------------------------

fn extract_blocks(page: &Page, blocks: &[RawTextBlock]) -> Vec<Block> {
    // Already in reading order; no font metadata is available for this
    // shape, so every block gets the defaults.
    blocks
        .iter()
        .map(|raw| Block {
            text_content: clean_text(&raw.text),
            bbox: raw.bbox,
            font_size: DEFAULT_FONT_SIZE,
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            block_type: BlockType::Body,
            page_number: page.number,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Flat-word variant
// ---------------------------------------------------------------------------

/// Accumulator for the word strategy's open block.
#[derive(Debug)]
struct WordAccumulator {
    texts: Vec<String>,
    bbox: BBox,
    block_no: Option<u32>,
}

impl WordAccumulator {
    fn new() -> Self {
        WordAccumulator {
            texts: Vec::new(),
            bbox: BBox::empty(),
            block_no: None,
        }
    }

    /// True when `word` belongs to a new block: the source block number
    /// changed, or the word sits more than [`WORD_BLOCK_Y_SPLIT`] units
    /// from the open block's top.
    fn starts_new_block(&self, word: &RawWord) -> bool {
        match self.block_no {
            None => false,
            Some(no) => {
                no != word.block_no || (word.bbox.y0 - self.bbox.y0).abs() > WORD_BLOCK_Y_SPLIT
            }
        }
    }

    fn push(&mut self, word: &RawWord) {
        self.texts.push(word.text.clone());
        self.bbox = self.bbox.union(&word.bbox);
        self.block_no = Some(word.block_no);
    }

    /// Close the open block, if any, resetting the accumulator.
    fn flush(&mut self, page: &Page) -> Option<Block> {
        if self.texts.is_empty() {
            return None;
        }
        let acc = std::mem::replace(self, WordAccumulator::new());
        Some(Block {
            text_content: clean_text(&acc.texts.join(" ")),
            bbox: acc.bbox,
            font_size: DEFAULT_FONT_SIZE,
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            block_type: classify_block_type(DEFAULT_FONT_SIZE, acc.bbox.y0, page.height),
            page_number: page.number,
        })
    }
}

fn extract_words(page: &Page, words: &[RawWord]) -> Vec<Block> {
    let mut out = Vec::new();
    let mut acc = WordAccumulator::new();

    for word in words {
        if acc.starts_new_block(word) {
            out.extend(acc.flush(page));
        }
        acc.push(word);
    }

    out.extend(acc.flush(page));
    out
}

// ---------------------------------------------------------------------------
// Analysis variant
// ---------------------------------------------------------------------------

/// Longest-text span of a line; ties keep the leftmost candidate (members
/// are already ordered by ascending x0).
fn representative_span(line: &TextLine) -> &TextSpan {
    let mut main = &line.spans[0];
    for span in &line.spans[1..] {
        if span.text.chars().count() > main.text.chars().count() {
            main = span;
        }
    }
    main
}

fn extract_analysis(page: &Page, blocks: &[RawBlock]) -> PageExtraction {
    let spans: Vec<TextSpan> = blocks
        .iter()
        .flat_map(|block| block.lines.iter())
        .flat_map(|line| line.spans.iter())
        .map(|raw| span_from_raw(raw, page.number))
        .collect();

    let lines = group_into_lines(&spans, DEFAULT_Y_TOLERANCE);

    let blocks_out = lines
        .iter()
        .map(|line| {
            let main = representative_span(line);
            Block {
                text_content: clean_text(&line.text()),
                bbox: line.bbox,
                font_size: main.font_size,
                font_name: main.font_name.clone(),
                font_color: main.font_color.clone(),
                block_type: classify_block_type(main.font_size, line.bbox.y0, page.height),
                page_number: page.number,
            }
        })
        .collect();

    PageExtraction {
        blocks: blocks_out,
        spans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FontFlags, RawLine};

    fn raw_span(text: &str, bbox: BBox, size: f32) -> RawSpan {
        RawSpan {
            text: text.to_string(),
            bbox,
            font_name: "Helvetica".to_string(),
            font_size: size,
            color: None,
            flags: FontFlags(0),
        }
    }

    fn structured_page(blocks: Vec<RawBlock>) -> Page {
        Page {
            number: 1,
            height: 800.0,
            content: PageContent::Structured(blocks),
        }
    }

    fn text_block(bbox: BBox, spans: Vec<RawSpan>) -> RawBlock {
        RawBlock {
            bbox,
            lines: vec![RawLine { bbox, spans }],
        }
    }

    // -- cleaning ----------------------------------------------------------

    #[test]
    fn test_clean_collapses_doubled_characters() {
        assert_eq!(clean_text("aabbcc"), "abc");
    }

    #[test]
    fn test_clean_doubled_pairs_are_non_overlapping() {
        assert_eq!(clean_text("aaa"), "aa");
        assert_eq!(clean_text("aaaa"), "aa");
    }

    #[test]
    fn test_clean_collapses_period_runs() {
        assert_eq!(clean_text("page....1"), "page.1");
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_text("a    b"), "a b");
        assert_eq!(clean_text("a\t\n b"), "a b");
    }

    #[test]
    fn test_clean_roman_numeral_dots() {
        assert_eq!(clean_text("II.."), "II.");
        assert_eq!(clean_text("XIV... Chapter"), "XIV. Chapter");
    }

    #[test]
    fn test_clean_trims() {
        assert_eq!(clean_text("  hello  "), "hello");
        assert_eq!(clean_text(""), "");
    }

    // -- color -------------------------------------------------------------

    #[test]
    fn test_color_zero_is_black() {
        assert_eq!(color_to_hex(Some(0)), "#000000");
    }

    #[test]
    fn test_color_red() {
        assert_eq!(color_to_hex(Some(16_711_680)), "#ff0000");
    }

    #[test]
    fn test_color_absent_is_black() {
        assert_eq!(color_to_hex(None), "#000000");
    }

    // -- classification ----------------------------------------------------

    #[test]
    fn test_classify_headline_anywhere() {
        assert_eq!(classify_block_type(16.0, 100.0, 800.0), BlockType::Headline);
        assert_eq!(classify_block_type(16.0, 780.0, 800.0), BlockType::Headline);
    }

    #[test]
    fn test_classify_footnote_small_and_low() {
        assert_eq!(classify_block_type(8.0, 720.0, 800.0), BlockType::Footnote);
    }

    #[test]
    fn test_classify_body_mid_page() {
        assert_eq!(classify_block_type(10.0, 400.0, 800.0), BlockType::Body);
    }

    #[test]
    fn test_classify_small_but_high_is_body() {
        // Small text outside the bottom 15% is not a footnote.
        assert_eq!(classify_block_type(8.0, 100.0, 800.0), BlockType::Body);
    }

    // -- strategy lookup ---------------------------------------------------

    #[test]
    fn test_from_name_known() {
        assert_eq!(Strategy::from_name("structured").unwrap(), Strategy::Structured);
        assert_eq!(Strategy::from_name("analysis").unwrap(), Strategy::Analysis);
    }

    #[test]
    fn test_from_name_unknown_lists_names() {
        let err = Strategy::from_name("pdfminer").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pdfminer"));
        for name in STRATEGY_NAMES {
            assert!(msg.contains(name), "missing `{name}` in: {msg}");
        }
    }

    // -- structured variant ------------------------------------------------

    #[test]
    fn test_structured_sorts_blocks_by_position() {
        let lower = text_block(
            BBox::new(50.0, 300.0, 200.0, 320.0),
            vec![raw_span("second", BBox::new(50.0, 300.0, 200.0, 320.0), 11.0)],
        );
        let upper = text_block(
            BBox::new(50.0, 100.0, 200.0, 120.0),
            vec![raw_span("first", BBox::new(50.0, 100.0, 200.0, 120.0), 11.0)],
        );
        let page = structured_page(vec![lower, upper]);

        let out = Strategy::Structured.extract_text(&page).unwrap();
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.blocks[0].text_content, "first");
        assert_eq!(out.blocks[1].text_content, "second");
        assert!(out.spans.is_empty());
    }

    #[test]
    fn test_structured_skips_lineless_and_empty_blocks() {
        let image_block = RawBlock {
            bbox: BBox::new(0.0, 0.0, 100.0, 100.0),
            lines: Vec::new(),
        };
        let blank = text_block(
            BBox::new(0.0, 200.0, 100.0, 220.0),
            vec![raw_span("   ", BBox::new(0.0, 200.0, 100.0, 220.0), 11.0)],
        );
        let page = structured_page(vec![image_block, blank]);

        let out = Strategy::Structured.extract_text(&page).unwrap();
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_structured_representative_font_is_first_span() {
        let bbox = BBox::new(10.0, 50.0, 300.0, 70.0);
        let mut big = raw_span("Title", bbox, 18.0);
        big.color = Some(16_711_680);
        let small = raw_span("subtitle", bbox, 9.0);
        let page = structured_page(vec![text_block(bbox, vec![big, small])]);

        let out = Strategy::Structured.extract_text(&page).unwrap();
        let block = &out.blocks[0];
        assert_eq!(block.font_size, 18.0);
        assert_eq!(block.font_color, "#ff0000");
        assert_eq!(block.block_type, BlockType::Headline);
        assert_eq!(block.text_content, "Title subtitle");
    }

    #[test]
    fn test_structured_line_without_spans_is_extraction_error() {
        let bbox = BBox::new(0.0, 0.0, 100.0, 20.0);
        let block = RawBlock {
            bbox,
            lines: vec![
                RawLine { bbox, spans: Vec::new() },
                RawLine {
                    bbox,
                    spans: vec![raw_span("text", bbox, 11.0)],
                },
            ],
        };
        let page = structured_page(vec![block]);

        let err = Strategy::Structured.extract_text(&page).unwrap_err();
        assert!(matches!(err, PdfStyleError::Extraction { page: 1, .. }));
    }

    #[test]
    fn test_shape_mismatch_is_extraction_error() {
        let page = Page {
            number: 3,
            height: 800.0,
            content: PageContent::Words(Vec::new()),
        };
        let err = Strategy::Structured.extract_text(&page).unwrap_err();
        assert!(matches!(err, PdfStyleError::Extraction { page: 3, .. }));
    }

    // -- flat-block variant ------------------------------------------------

    #[test]
    fn test_blocks_variant_uses_defaults() {
        let page = Page {
            number: 2,
            height: 800.0,
            content: PageContent::Blocks(vec![RawTextBlock {
                bbox: BBox::new(10.0, 10.0, 200.0, 30.0),
                text: "Some  text\n".to_string(),
            }]),
        };

        let out = Strategy::Blocks.extract_text(&page).unwrap();
        let block = &out.blocks[0];
        assert_eq!(block.text_content, "Some text");
        assert_eq!(block.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(block.font_name, DEFAULT_FONT_NAME);
        assert_eq!(block.font_color, DEFAULT_FONT_COLOR);
        assert_eq!(block.block_type, BlockType::Body);
        assert_eq!(block.page_number, 2);
    }

    // -- flat-word variant -------------------------------------------------

    fn word(text: &str, y0: f32, block_no: u32) -> RawWord {
        RawWord {
            bbox: BBox::new(10.0, y0, 40.0, y0 + 10.0),
            text: text.to_string(),
            block_no,
            line_no: 0,
        }
    }

    #[test]
    fn test_words_split_on_block_number_change() {
        let page = Page {
            number: 1,
            height: 800.0,
            content: PageContent::Words(vec![
                word("one", 100.0, 0),
                word("two", 100.0, 0),
                word("three", 100.0, 1),
            ]),
        };

        let out = Strategy::Words.extract_text(&page).unwrap();
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.blocks[0].text_content, "one two");
        assert_eq!(out.blocks[1].text_content, "three");
    }

    #[test]
    fn test_words_split_on_vertical_displacement() {
        let page = Page {
            number: 1,
            height: 800.0,
            content: PageContent::Words(vec![
                word("one", 100.0, 0),
                word("two", 112.0, 0),
                // 25 units below the open block's top (y0 = 100).
                word("far", 125.0, 0),
            ]),
        };

        let out = Strategy::Words.extract_text(&page).unwrap();
        assert_eq!(out.blocks.len(), 2);
        assert_eq!(out.blocks[0].text_content, "one two");
        assert_eq!(out.blocks[1].text_content, "far");
    }

    #[test]
    fn test_words_final_block_is_flushed() {
        let page = Page {
            number: 1,
            height: 800.0,
            content: PageContent::Words(vec![word("only", 100.0, 0)]),
        };

        let out = Strategy::Words.extract_text(&page).unwrap();
        assert_eq!(out.blocks.len(), 1);
        assert_eq!(out.blocks[0].text_content, "only");
        assert_eq!(out.blocks[0].bbox, BBox::new(10.0, 100.0, 40.0, 110.0));
    }

    #[test]
    fn test_words_empty_input() {
        let page = Page {
            number: 1,
            height: 800.0,
            content: PageContent::Words(Vec::new()),
        };
        let out = Strategy::Words.extract_text(&page).unwrap();
        assert!(out.blocks.is_empty());
    }

    // -- analysis variant --------------------------------------------------

    #[test]
    fn test_analysis_retains_spans_and_blocks_per_line() {
        let bbox_a = BBox::new(10.0, 100.0, 100.0, 112.0);
        let bbox_b = BBox::new(110.0, 101.0, 220.0, 113.0);
        let bbox_c = BBox::new(10.0, 130.0, 150.0, 142.0);
        let block = RawBlock {
            bbox: BBox::new(10.0, 100.0, 220.0, 142.0),
            lines: vec![
                RawLine {
                    bbox: bbox_a.union(&bbox_b),
                    spans: vec![raw_span("short", bbox_a, 11.0), raw_span("a longer run", bbox_b, 9.0)],
                },
                RawLine {
                    bbox: bbox_c,
                    spans: vec![raw_span("next line", bbox_c, 11.0)],
                },
            ],
        };
        let page = structured_page(vec![block]);

        let out = Strategy::Analysis.extract_text(&page).unwrap();
        assert_eq!(out.spans.len(), 3);
        assert_eq!(out.blocks.len(), 2);
        // Representative font comes from the longest span on the line.
        assert_eq!(out.blocks[0].font_size, 9.0);
        assert_eq!(out.blocks[0].text_content, "short a longer run");
    }

    #[test]
    fn test_analysis_representative_tie_keeps_leftmost() {
        let left = BBox::new(10.0, 100.0, 60.0, 112.0);
        let right = BBox::new(70.0, 100.0, 120.0, 112.0);
        let mut a = raw_span("abcd", left, 10.0);
        a.font_name = "Left".to_string();
        let mut b = raw_span("wxyz", right, 12.0);
        b.font_name = "Right".to_string();
        let page = structured_page(vec![text_block(left.union(&right), vec![b, a])]);

        let out = Strategy::Analysis.extract_text(&page).unwrap();
        assert_eq!(out.blocks[0].font_name, "Left");
    }

    #[test]
    fn test_analysis_decodes_font_flags() {
        let bbox = BBox::new(10.0, 100.0, 60.0, 112.0);
        let mut raw = raw_span("styled", bbox, 11.0);
        raw.flags = FontFlags(16 | 2);
        let page = structured_page(vec![text_block(bbox, vec![raw])]);

        let out = Strategy::Analysis.extract_text(&page).unwrap();
        let span = &out.spans[0];
        assert!(span.is_bold);
        assert!(span.is_italic);
        assert!(!span.is_underlined);
    }
}
