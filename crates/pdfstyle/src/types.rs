use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// An axis-aligned bounding box with top-left origin (y grows downward).
///
/// Invariants: `x0 <= x1` and `y0 <= y1` for well-formed boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    /// A degenerate box that acts as the identity for [`BBox::union`].
    pub fn empty() -> Self {
        BBox {
            x0: f32::INFINITY,
            y0: f32::INFINITY,
            x1: f32::NEG_INFINITY,
            y1: f32::NEG_INFINITY,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Per-axis min/max union of two boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Spans and lines
// ---------------------------------------------------------------------------

/// A single run of positioned, uniformly styled text from the page source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    pub font_color: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underlined: bool,
    /// 1-based page index.
    pub page_number: u32,
}

impl TextSpan {
    /// The visual style identity of this span.
    pub fn signature(&self) -> StyleSignature {
        StyleSignature {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            font_color: self.font_color.clone(),
            is_bold: self.is_bold,
            is_italic: self.is_italic,
            is_underlined: self.is_underlined,
        }
    }
}

/// A horizontal line of text: spans sharing (approximately) one y-coordinate.
///
/// Members are ordered left-to-right; the bbox is the union of member boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub bbox: BBox,
}

impl TextLine {
    /// Concatenate all member texts with a single space separator.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Classification of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Headline,
    Body,
    Footnote,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Headline => write!(f, "headline"),
            BlockType::Body => write!(f, "body"),
            BlockType::Footnote => write!(f, "footnote"),
        }
    }
}

/// A normalized extraction unit, built once by a strategy and never mutated.
///
/// The representative font attributes describe the block as a whole; which
/// span they come from is strategy-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub text_content: String,
    pub bbox: BBox,
    pub font_size: f32,
    pub font_name: String,
    pub font_color: String,
    pub block_type: BlockType,
    /// 1-based page index.
    pub page_number: u32,
}

// ---------------------------------------------------------------------------
// Style statistics
// ---------------------------------------------------------------------------

/// The 6-tuple identifying one distinct visual text style within a document.
///
/// Equality is exact on every field, including the floating-point
/// `font_size` -- two sizes differing in the last bit are distinct styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSignature {
    pub font_name: String,
    pub font_size: f32,
    pub font_color: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underlined: bool,
}

impl Eq for StyleSignature {}

impl Hash for StyleSignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_name.hash(state);
        self.font_size.to_bits().hash(state);
        self.font_color.hash(state);
        self.is_bold.hash(state);
        self.is_italic.hash(state);
        self.is_underlined.hash(state);
    }
}

/// Closed min/max interval over one coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordRange {
    pub min: f32,
    pub max: f32,
}

/// Per-signature aggregate built by the style analyzer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleStatistic {
    pub signature: StyleSignature,
    pub occurrence_count: usize,
    /// Up to 3 snippets of at most 100 characters each.
    pub examples: Vec<String>,
    /// Sorted distinct 1-based page numbers the style appears on.
    pub page_distribution: Vec<u32>,
    /// min/max of member x0 coordinates.
    pub x_range: CoordRange,
    /// min/max of member y0 coordinates.
    pub y_range: CoordRange,
}

// ---------------------------------------------------------------------------
// Analysis report
// ---------------------------------------------------------------------------

/// Aggregate line-geometry metrics over the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub average_width: f32,
    /// Sample (n-1) standard deviation of line widths; 0.0 below 2 lines.
    pub width_std: f32,
    pub average_left_margin: f32,
}

impl LineMetrics {
    pub fn zeroed() -> Self {
        LineMetrics {
            average_width: 0.0,
            width_std: 0.0,
            average_left_margin: 0.0,
        }
    }
}

/// The per-document statistical summary of visual text styles.
///
/// `common_styles` is a lossy top-10 view ranked by occurrence count; the
/// full aggregation behind it always sums to the analyzed span count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub common_styles: Vec<StyleStatistic>,
    pub line_metrics: LineMetrics,
}

impl AnalysisReport {
    /// The degraded report: no styles, zeroed metrics.
    pub fn empty() -> Self {
        AnalysisReport {
            common_styles: Vec::new(),
            line_metrics: LineMetrics::zeroed(),
        }
    }
}
