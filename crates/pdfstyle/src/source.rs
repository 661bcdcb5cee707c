//! Contracts for the external page source.
//!
//! The algorithmic core never talks to a PDF library to read text; an
//! external producer walks the document and hands over one [`Page`] per
//! physical page, in one of three shapes. This keeps every strategy a pure
//! transformation over plain values and lets tests feed synthetic pages.

use serde::{Deserialize, Serialize};

use crate::types::BBox;

// ---------------------------------------------------------------------------
// Font flags
// ---------------------------------------------------------------------------

/// Packed font style flags as delivered by the page source.
///
/// Bit assignments: italic = bit 1, underline = bit 2, bold = bit 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFlags(pub u32);

impl FontFlags {
    const ITALIC: u32 = 1 << 1;
    const UNDERLINE: u32 = 1 << 2;
    const BOLD: u32 = 1 << 4;

    pub fn is_bold(&self) -> bool {
        self.0 & Self::BOLD != 0
    }

    pub fn is_italic(&self) -> bool {
        self.0 & Self::ITALIC != 0
    }

    pub fn is_underlined(&self) -> bool {
        self.0 & Self::UNDERLINE != 0
    }
}

// ---------------------------------------------------------------------------
// Structured span tree
// ---------------------------------------------------------------------------

/// A raw text run inside the structured span tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    /// Packed 24-bit sRGB value; absent means black.
    pub color: Option<u32>,
    pub flags: FontFlags,
}

/// One line of a structured block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub bbox: BBox,
    pub spans: Vec<RawSpan>,
}

/// A top-level block of the structured span tree.
///
/// Non-text blocks (images and the like) arrive with no lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub bbox: BBox,
    pub lines: Vec<RawLine>,
}

// ---------------------------------------------------------------------------
// Flat shapes
// ---------------------------------------------------------------------------

/// A pre-segmented text block: bbox plus text, already in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextBlock {
    pub bbox: BBox,
    pub text: String,
}

/// A single word with its source block/line counters, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    pub bbox: BBox,
    pub text: String,
    pub block_no: u32,
    pub line_no: u32,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The content of one page in whichever shape the source produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageContent {
    /// Structured span tree with full font metadata.
    Structured(Vec<RawBlock>),
    /// Flat ordered (bbox, text) list; no font metadata.
    Blocks(Vec<RawTextBlock>),
    /// Flat ordered word list with block/line counters; no font metadata.
    Words(Vec<RawWord>),
}

impl PageContent {
    /// Short shape name used in extraction error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            PageContent::Structured(_) => "structured",
            PageContent::Blocks(_) => "blocks",
            PageContent::Words(_) => "words",
        }
    }
}

/// One page as delivered by the page source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page index.
    pub number: u32,
    /// Page height in the source's pixel units.
    pub height: f32,
    pub content: PageContent,
}
