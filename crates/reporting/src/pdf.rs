//! PDF rendering of the insight summary. Layout is computed first as plain
//! placements so pagination can be checked without reading PDF bytes.

use crate::insights::InsightSummary;
use influence_core::{DashboardError, DashboardResult};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::Path;
use tracing::info;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;

const TITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 12.0;
const ENTRY_SIZE: f32 = 10.0;

const TITLE_HEIGHT_MM: f32 = 10.0;
const HEADING_HEIGHT_MM: f32 = 10.0;
const ENTRY_HEIGHT_MM: f32 = 8.0;
const AFTER_TITLE_MM: f32 = 10.0;
const AFTER_SECTION_MM: f32 = 5.0;

// Average Helvetica advance is close to half an em; 1pt = 0.3528mm.
const AVG_GLYPH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub x_mm: f32,
    /// Baseline measured from the bottom edge, as PDF coordinates run.
    pub y_mm: f32,
    pub size: f32,
    pub style: FontStyle,
    pub text: String,
}

struct Cursor {
    page: usize,
    top_mm: f32,
    placements: Vec<Placement>,
}

impl Cursor {
    fn new() -> Self {
        Self {
            page: 0,
            top_mm: MARGIN_MM,
            placements: Vec::new(),
        }
    }

    /// Place one line in a cell of `height`, starting a new page when the
    /// cell would cross the bottom margin.
    fn line(&mut self, text: &str, size: f32, style: FontStyle, height: f32, centered: bool) {
        if self.top_mm + height > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            self.page += 1;
            self.top_mm = MARGIN_MM;
        }
        let x_mm = if centered {
            let width = text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM;
            ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
        } else {
            MARGIN_MM
        };
        // Vertically centre the baseline in the cell.
        let baseline_from_top = self.top_mm + height / 2.0 + size * PT_TO_MM * 0.35;
        self.placements.push(Placement {
            page: self.page,
            x_mm,
            y_mm: PAGE_HEIGHT_MM - baseline_from_top,
            size,
            style,
            text: text.to_string(),
        });
        self.top_mm += height;
    }

    fn gap(&mut self, height: f32) {
        self.top_mm += height;
    }
}

/// Title centred on top, then each section as a bold heading followed by
/// one line per entry.
pub fn layout(summary: &InsightSummary) -> Vec<Placement> {
    let mut cursor = Cursor::new();
    cursor.line(&summary.title, TITLE_SIZE, FontStyle::Regular, TITLE_HEIGHT_MM, true);
    cursor.gap(AFTER_TITLE_MM);

    for section in &summary.sections {
        cursor.line(&section.heading, HEADING_SIZE, FontStyle::Bold, HEADING_HEIGHT_MM, false);
        for line in &section.lines {
            cursor.line(line, ENTRY_SIZE, FontStyle::Regular, ENTRY_HEIGHT_MM, false);
        }
        cursor.gap(AFTER_SECTION_MM);
    }

    cursor.placements
}

pub fn render_pdf(summary: &InsightSummary) -> DashboardResult<Vec<u8>> {
    let placements = layout(summary);
    let page_count = placements.last().map_or(1, |p| p.page + 1);

    let (doc, first_page, first_layer) = PdfDocument::new(
        summary.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..page_count {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for placement in &placements {
        let font = match placement.style {
            FontStyle::Regular => &regular,
            FontStyle::Bold => &bold,
        };
        layers[placement.page].use_text(
            placement.text.as_str(),
            placement.size,
            Mm(placement.x_mm),
            Mm(placement.y_mm),
            font,
        );
    }

    doc.save_to_bytes().map_err(pdf_error)
}

pub fn export_pdf(summary: &InsightSummary, path: &Path) -> DashboardResult<()> {
    let bytes = render_pdf(summary)?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "PDF exported");
    Ok(())
}

fn pdf_error<E: std::fmt::Debug>(err: E) -> DashboardError {
    DashboardError::Report(format!("PDF rendering failed: {err:?}"))
}
