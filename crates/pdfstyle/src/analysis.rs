//! Line grouping and per-document style aggregation.
//!
//! [`group_into_lines`] clusters spans into horizontal lines by vertical
//! proximity; [`analyze_spans`] aggregates spans by visual-style signature
//! and line geometry into a ranked [`AnalysisReport`].
//!
//! Both are pure functions: the analyzer builds a fresh accumulator on
//! every call, so independent documents can be analyzed from independent
//! threads without shared state.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::types::{
    AnalysisReport, BBox, CoordRange, LineMetrics, StyleSignature, StyleStatistic, TextLine,
    TextSpan,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Spans whose y0 is within this distance of a line's first member belong
/// to that line.
pub const DEFAULT_Y_TOLERANCE: f32 = 3.0;

/// The ranked report keeps at most this many styles.
const MAX_COMMON_STYLES: usize = 10;

/// At most this many example snippets are kept per style.
const MAX_EXAMPLES: usize = 3;

/// Example snippets are cut to this many characters.
const MAX_EXAMPLE_LEN: usize = 100;

/// Spans shorter than this (trimmed) are not worth quoting as examples.
const MIN_EXAMPLE_LEN: usize = 3;

// ---------------------------------------------------------------------------
// Line grouping
// ---------------------------------------------------------------------------

/// Group spans into horizontal lines by vertical proximity.
///
/// Spans are stably sorted by (y0, x0) ascending and swept once. Each open
/// line is anchored at the y0 of its *first* member -- the anchor never
/// drifts to a running average -- and a span joins the open line iff its y0
/// is within `y_tolerance` of that anchor. Line bboxes are the per-axis
/// min/max of their members; members end up ordered left-to-right.
pub fn group_into_lines(spans: &[TextSpan], y_tolerance: f32) -> Vec<TextLine> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(Ordering::Equal)
            .then(a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<&TextSpan> = vec![sorted[0]];
    let mut anchor_y0 = sorted[0].bbox.y0;

    for &span in &sorted[1..] {
        if (span.bbox.y0 - anchor_y0).abs() <= y_tolerance {
            current.push(span);
        } else {
            lines.push(assemble_line(std::mem::take(&mut current)));
            anchor_y0 = span.bbox.y0;
            current.push(span);
        }
    }

    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

/// Build a [`TextLine`] from the members of a closed line.
fn assemble_line(members: Vec<&TextSpan>) -> TextLine {
    let bbox = members
        .iter()
        .fold(BBox::empty(), |acc, span| acc.union(&span.bbox));

    let mut spans: Vec<TextSpan> = members.into_iter().cloned().collect();
    spans.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(Ordering::Equal)
    });

    TextLine { spans, bbox }
}

// ---------------------------------------------------------------------------
// Style aggregation
// ---------------------------------------------------------------------------

/// Per-signature accumulation state.
#[derive(Debug)]
struct StyleBucket {
    /// Rank position for stable tie-breaking: order of first appearance.
    first_seen: usize,
    count: usize,
    examples: Vec<String>,
    pages: BTreeSet<u32>,
    x_coords: Vec<f32>,
    y_coords: Vec<f32>,
}

impl StyleBucket {
    fn new(first_seen: usize) -> Self {
        StyleBucket {
            first_seen,
            count: 0,
            examples: Vec::new(),
            pages: BTreeSet::new(),
            x_coords: Vec::new(),
            y_coords: Vec::new(),
        }
    }

    fn record(&mut self, span: &TextSpan) {
        self.count += 1;

        if self.examples.len() < MAX_EXAMPLES && span.text.trim().chars().count() > MIN_EXAMPLE_LEN
        {
            self.examples
                .push(span.text.chars().take(MAX_EXAMPLE_LEN).collect());
        }

        self.x_coords.push(span.bbox.x0);
        self.y_coords.push(span.bbox.y0);
        self.pages.insert(span.page_number);
    }

    fn into_statistic(self, signature: StyleSignature) -> StyleStatistic {
        StyleStatistic {
            signature,
            occurrence_count: self.count,
            examples: self.examples,
            page_distribution: self.pages.into_iter().collect(),
            x_range: coord_range(&self.x_coords),
            y_range: coord_range(&self.y_coords),
        }
    }
}

fn coord_range(coords: &[f32]) -> CoordRange {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &c in coords {
        min = min.min(c);
        max = max.max(c);
    }
    CoordRange { min, max }
}

/// A span the aggregation cannot use: non-finite geometry or a nonsensical
/// font size.
fn malformed_reason(span: &TextSpan) -> Option<&'static str> {
    if !span.bbox.is_finite() {
        return Some("non-finite bbox coordinate");
    }
    if !span.font_size.is_finite() || span.font_size <= 0.0 {
        return Some("non-positive font size");
    }
    None
}

/// Rank every style present in `spans`, most frequent first.
///
/// Ties keep first-appearance order. The returned list is complete (not
/// truncated); its occurrence counts sum to the number of well-formed
/// spans.
fn rank_styles(spans: &[TextSpan]) -> Vec<StyleStatistic> {
    let mut buckets: HashMap<StyleSignature, StyleBucket> = HashMap::new();

    for span in spans {
        let signature = span.signature();
        let next_index = buckets.len();
        buckets
            .entry(signature)
            .or_insert_with(|| StyleBucket::new(next_index))
            .record(span);
    }

    let mut ranked: Vec<(StyleSignature, StyleBucket)> = buckets.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });

    ranked
        .into_iter()
        .map(|(signature, bucket)| bucket.into_statistic(signature))
        .collect()
}

/// Sample (n-1) standard deviation; 0.0 below 2 samples.
fn sample_std(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);
    variance.sqrt() as f32
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Aggregate spans into the per-document style report.
///
/// Malformed spans are skipped with a warning and excluded from every
/// aggregate; the pass never aborts for a recoverable per-item defect.
/// Empty (or fully malformed) input degrades to [`AnalysisReport::empty`].
pub fn analyze_spans(spans: &[TextSpan]) -> AnalysisReport {
    let well_formed: Vec<TextSpan> = spans
        .iter()
        .filter(|span| match malformed_reason(span) {
            Some(reason) => {
                tracing::warn!(
                    page = span.page_number,
                    "skipping span with {reason}: {:?}",
                    span.text
                );
                false
            }
            None => true,
        })
        .cloned()
        .collect();

    if well_formed.is_empty() {
        return AnalysisReport::empty();
    }

    let mut common_styles = rank_styles(&well_formed);
    common_styles.truncate(MAX_COMMON_STYLES);

    // Line metrics are aggregated independently of the style buckets.
    let lines = group_into_lines(&well_formed, DEFAULT_Y_TOLERANCE);
    let widths: Vec<f32> = lines.iter().map(|line| line.bbox.width()).collect();
    let margins: Vec<f32> = lines.iter().map(|line| line.bbox.x0).collect();

    AnalysisReport {
        common_styles,
        line_metrics: LineMetrics {
            average_width: mean(&widths),
            width_std: sample_std(&widths),
            average_left_margin: mean(&margins),
        },
    }
}
