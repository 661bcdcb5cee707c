//! Highlight overlay: paints every span of a ranked style with that
//! style's palette color on a copy of the source document.
//!
//! The input document is never mutated. The overlay is a per-page content
//! stream of borderless, 30%-opacity filled rectangles appended after the
//! page's own content, so the original graphics stay untouched underneath.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId};

use crate::extract::span_from_raw;
use crate::source::{Page, PageContent};
use crate::types::{BBox, StyleSignature, StyleStatistic};
use crate::PdfStyleError;

/// An RGB color with components in `0.0..=1.0`.
pub type Rgb = [f32; 3];

/// Fixed marker palette, cycled modulo its length for ranks past the end.
pub const HIGHLIGHT_PALETTE: [Rgb; 10] = [
    [1.0, 0.9, 0.0], // yellow
    [0.3, 1.0, 0.3], // green
    [1.0, 0.5, 0.5], // pink
    [0.5, 0.7, 1.0], // blue
    [1.0, 0.6, 0.0], // orange
    [0.0, 0.8, 0.8], // cyan
    [1.0, 0.4, 1.0], // magenta
    [0.8, 1.0, 0.0], // lime
    [1.0, 0.7, 0.4], // peach
    [0.4, 0.8, 1.0], // sky blue
];

/// Fill opacity of highlight rectangles.
pub const HIGHLIGHT_OPACITY: f32 = 0.3;

/// Resource name of the shared highlight graphics state.
const GS_NAME: &str = "GShl";

fn pdf_err(e: impl ToString) -> PdfStyleError {
    PdfStyleError::Pdf(e.to_string())
}

/// Palette color for a style at the given rank.
pub fn palette_color(rank: usize) -> Rgb {
    HIGHLIGHT_PALETTE[rank % HIGHLIGHT_PALETTE.len()]
}

/// Zip ranked styles with the cycled palette, keyed by the full signature.
///
/// Spans whose signature is absent from `styles` receive no highlight.
pub fn style_color_map(styles: &[StyleStatistic]) -> HashMap<StyleSignature, Rgb> {
    styles
        .iter()
        .enumerate()
        .map(|(rank, style)| (style.signature.clone(), palette_color(rank)))
        .collect()
}

/// Write a highlighted copy of `source` to `output_path` and return that
/// path.
///
/// `pages` must be the same page sequence (structured shape) the styles
/// were computed from; its page numbers are matched against the document's
/// 1-based page order. Pages in flat shapes carry no style signatures and
/// are copied without overlay.
pub fn create_highlighted_document(
    source: &lopdf::Document,
    pages: &[Page],
    styles: &[StyleStatistic],
    output_path: impl AsRef<Path>,
) -> Result<PathBuf, PdfStyleError> {
    let colors = style_color_map(styles);

    // Operate on a clone so the caller's document survives verbatim.
    let mut doc = source.clone();
    let page_ids = doc.get_pages();

    let mut gs_id: Option<ObjectId> = None;

    for page in pages {
        let Some(&page_id) = page_ids.get(&page.number) else {
            continue;
        };

        let rects = collect_highlight_rects(page, &colors);
        if rects.is_empty() {
            continue;
        }

        // One ExtGState is shared by every overlay in the document.
        let gs_id = *gs_id.get_or_insert_with(|| doc.add_object(highlight_gstate()));
        register_gstate(&mut doc, page_id, gs_id)?;

        let content = overlay_content(&rects, page.height)?;
        let overlay_id = doc.add_object(Object::Stream(lopdf::Stream::new(
            Dictionary::new(),
            content,
        )));
        append_page_content(&mut doc, page_id, overlay_id)?;
    }

    doc.save(output_path.as_ref()).map_err(pdf_err)?;
    Ok(output_path.as_ref().to_path_buf())
}

/// Gather `(bbox, color)` for every span on the page whose signature is in
/// the color map.
fn collect_highlight_rects(
    page: &Page,
    colors: &HashMap<StyleSignature, Rgb>,
) -> Vec<(BBox, Rgb)> {
    let PageContent::Structured(blocks) = &page.content else {
        return Vec::new();
    };

    let mut rects = Vec::new();
    for block in blocks {
        for line in &block.lines {
            for raw in &line.spans {
                let span = span_from_raw(raw, page.number);
                if let Some(&color) = colors.get(&span.signature()) {
                    rects.push((span.bbox, color));
                }
            }
        }
    }
    rects
}

/// The shared 30%-opacity graphics state.
fn highlight_gstate() -> Dictionary {
    let mut gs = Dictionary::new();
    gs.set("Type", Object::Name(b"ExtGState".to_vec()));
    gs.set("ca", Object::Real(HIGHLIGHT_OPACITY));
    gs.set("CA", Object::Real(HIGHLIGHT_OPACITY));
    gs
}

/// Encode the overlay content stream: borderless filled rectangles under
/// the highlight graphics state.
///
/// Span boxes are top-left-origin; PDF user space grows upward, so each
/// rectangle is flipped through the page height.
fn overlay_content(rects: &[(BBox, Rgb)], page_height: f32) -> Result<Vec<u8>, PdfStyleError> {
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec![Object::Name(GS_NAME.as_bytes().to_vec())]),
    ];

    for &(bbox, [r, g, b]) in rects {
        operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        operations.push(Operation::new(
            "re",
            vec![
                bbox.x0.into(),
                (page_height - bbox.y1).into(),
                bbox.width().into(),
                bbox.height().into(),
            ],
        ));
        operations.push(Operation::new("f", vec![]));
    }

    operations.push(Operation::new("Q", vec![]));
    Content { operations }.encode().map_err(pdf_err)
}

/// Make the highlight graphics state reachable from a page's resources.
fn register_gstate(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    gs_id: ObjectId,
) -> Result<(), PdfStyleError> {
    // Resources may live inline on the page dictionary or behind a
    // reference.
    let resources_ref = {
        let dict = doc
            .get_object(page_id)
            .and_then(|obj| obj.as_dict())
            .map_err(pdf_err)?;
        match dict.get(b"Resources") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    match resources_ref {
        Some(id) => {
            let resources = doc
                .get_object_mut(id)
                .and_then(|obj| obj.as_dict_mut())
                .map_err(pdf_err)?;
            insert_gstate(resources, gs_id);
        }
        None => {
            let dict = doc
                .get_object_mut(page_id)
                .and_then(|obj| obj.as_dict_mut())
                .map_err(pdf_err)?;
            let mut resources = match dict.get(b"Resources") {
                Ok(Object::Dictionary(d)) => d.clone(),
                _ => Dictionary::new(),
            };
            insert_gstate(&mut resources, gs_id);
            dict.set("Resources", Object::Dictionary(resources));
        }
    }

    Ok(())
}

fn insert_gstate(resources: &mut Dictionary, gs_id: ObjectId) {
    let mut states = match resources.get(b"ExtGState") {
        Ok(Object::Dictionary(d)) => d.clone(),
        _ => Dictionary::new(),
    };
    states.set(GS_NAME, Object::Reference(gs_id));
    resources.set("ExtGState", Object::Dictionary(states));
}

/// Append the overlay stream after the page's existing content.
fn append_page_content(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    overlay_id: ObjectId,
) -> Result<(), PdfStyleError> {
    let dict = doc
        .get_object_mut(page_id)
        .and_then(|obj| obj.as_dict_mut())
        .map_err(pdf_err)?;

    let combined = match dict.get(b"Contents").ok().cloned() {
        Some(Object::Array(mut items)) => {
            items.push(overlay_id.into());
            Object::Array(items)
        }
        Some(existing @ Object::Reference(_)) => {
            Object::Array(vec![existing, overlay_id.into()])
        }
        _ => overlay_id.into(),
    };
    dict.set("Contents", combined);

    Ok(())
}
