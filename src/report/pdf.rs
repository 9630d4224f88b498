use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::ConvertError;
use crate::report::model::{DependencyBlock, Report, SectionBody, Table, TableKind};

const MM_PER_PT: f32 = 25.4 / 72.0;

// ── Palette ───────────────────────────────────────────────────────────────────
const TEXT:        (f32, f32, f32) = (0.00, 0.00, 0.00);
const HEADER_BG:   (f32, f32, f32) = (0.50, 0.50, 0.50); // grey
const HEADER_FG:   (f32, f32, f32) = (0.96, 0.96, 0.96); // whitesmoke
const BODY_SHADE:  (f32, f32, f32) = (0.96, 0.96, 0.86); // beige
const GRID:        (f32, f32, f32) = (0.00, 0.00, 0.00);
const FOOTER_TEXT: (f32, f32, f32) = (0.45, 0.45, 0.45);

// ── Flow metrics (points) ─────────────────────────────────────────────────────
const LEADING: f32 = 1.2;
const HEADING_SPACE_AFTER: f32 = 14.0;
const SECTION_GAP: f32 = 12.0;
const BLOCK_GAP: f32 = 12.0;
const INDENT: f32 = 20.0;
const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_Y: f32 = 3.0;
const HEADER_EXTRA_PAD: f32 = 9.0;
const MIN_COL_W: f32 = 24.0;
const GRID_W: f32 = 0.8;
const FOOTER_SIZE: f32 = 7.0;

/// Average Helvetica advance as a fraction of the font size. Builtin fonts
/// carry no metrics, so widths are estimated from character counts.
const AVG_GLYPH: f32 = 0.55;

/// Result of laying out a report: the serialized document and its page count.
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: u32,
}

/// Render `report` and write it to `output_path`, replacing any existing file.
pub fn render(report: &Report, layout: &LayoutConfig, output_path: &Path) -> Result<(), ConvertError> {
    debug!(output = %output_path.display(), "rendering PDF");
    let pdf = render_to_bytes(report, layout)?;

    std::fs::write(output_path, &pdf.bytes).map_err(|e| ConvertError::io(output_path, e))?;
    debug!(pages = pdf.pages, bytes = pdf.bytes.len(), "PDF written");
    Ok(())
}

/// Lay out every section as one flowing, paginated landscape document.
pub fn render_to_bytes(report: &Report, layout: &LayoutConfig) -> Result<RenderedPdf, ConvertError> {
    let mut page = PageWriter::new(&report.title, layout)?;

    for section in &report.sections {
        page.heading(&section.heading());
        match &section.body {
            SectionBody::Table(table) => {
                if table.kind != TableKind::KeyValue {
                    page.space(SECTION_GAP);
                }
                page.table(table);
                page.space(SECTION_GAP);
            }
            SectionBody::Dependencies(blocks) => {
                page.space(SECTION_GAP);
                for block in blocks {
                    page.dependency_block(block);
                }
            }
        }
    }

    page.finish()
}

// ── Page writer ───────────────────────────────────────────────────────────────

/// Cursor-based flow layout over `printpdf` pages. `cursor` is the y position
/// (points from the bottom edge) where the next element starts.
struct PageWriter<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    layout: &'a LayoutConfig,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page_w: f32,
    page_h: f32,
    cursor: f32,
    page_num: u32,
}

struct TableStyle {
    font_size: f32,
    centered: bool,
    shaded_body: bool,
}

impl TableStyle {
    fn for_kind(kind: TableKind, layout: &LayoutConfig) -> Self {
        match kind {
            TableKind::KeyValue => TableStyle {
                font_size: layout.table_font_size,
                centered: false,
                shaded_body: false,
            },
            TableKind::Components => TableStyle {
                font_size: layout.component_font_size,
                centered: true,
                shaded_body: true,
            },
            TableKind::Counts => TableStyle {
                font_size: layout.table_font_size,
                centered: true,
                shaded_body: false,
            },
        }
    }
}

/// A row with every cell already wrapped to its column.
struct LaidRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

impl LaidRow {
    fn lines(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }

    /// Keep the first `keep` lines of every cell and return the rest as a
    /// continuation row, or `None` when the row already has no more than `keep`.
    fn split_off(&mut self, keep: usize, line_h: f32) -> Option<LaidRow> {
        let lines = self.lines();
        if keep >= lines {
            return None;
        }
        let pad = self.height - lines as f32 * line_h;
        let cells = self
            .cells
            .iter_mut()
            .map(|cell| cell.split_off(keep.min(cell.len())))
            .collect();
        self.height = pad + keep as f32 * line_h;
        Some(LaidRow {
            cells,
            height: pad + (lines - keep) as f32 * line_h,
        })
    }
}

impl<'a> PageWriter<'a> {
    fn new(title: &str, layout: &'a LayoutConfig) -> Result<Self, ConvertError> {
        let (page_w, page_h) = layout.page_size.landscape();
        let (doc, page_idx, layer_idx) = PdfDocument::new(title, mm(page_w), mm(page_h), "Page 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        let mut writer = PageWriter {
            doc,
            layer,
            layout,
            regular,
            bold,
            page_w,
            page_h,
            cursor: page_h - layout.margin_top,
            page_num: 1,
        };
        writer.draw_footer();
        Ok(writer)
    }

    fn finish(self) -> Result<RenderedPdf, ConvertError> {
        let pages = self.page_num;
        let bytes = self.doc.save_to_bytes().map_err(render_err)?;
        Ok(RenderedPdf { bytes, pages })
    }

    fn top(&self) -> f32 {
        self.page_h - self.layout.margin_top
    }

    fn bottom(&self) -> f32 {
        self.layout.margin_bottom
    }

    fn left(&self) -> f32 {
        self.layout.margin_left
    }

    fn right(&self) -> f32 {
        self.page_w - self.layout.margin_right
    }

    fn frame_width(&self) -> f32 {
        self.right() - self.left()
    }

    fn new_page(&mut self) {
        self.page_num += 1;
        let (page_idx, layer_idx) = self.doc.add_page(
            mm(self.page_w),
            mm(self.page_h),
            format!("Page {}", self.page_num),
        );
        self.layer = self.doc.get_page(page_idx).get_layer(layer_idx);
        self.cursor = self.top();
        self.draw_footer();
    }

    /// Break to a new page unless `height` still fits above the bottom margin.
    /// A page that is still empty accepts anything.
    fn reserve(&mut self, height: f32) {
        if self.cursor - height < self.bottom() && self.cursor < self.top() {
            self.new_page();
        }
    }

    fn space(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn draw_footer(&self) {
        let y = self.layout.margin_bottom / 2.0 - FOOTER_SIZE / 2.0;
        let version = format!("Generated by sbom-report v{}", env!("CARGO_PKG_VERSION"));
        let page = format!("Page {}", self.page_num);
        let page_x = self.right() - text_width(&page, FOOTER_SIZE);
        self.put_text(&version, FOOTER_SIZE, self.left(), y, false, FOOTER_TEXT);
        self.put_text(&page, FOOTER_SIZE, page_x, y, false, FOOTER_TEXT);
    }

    fn heading(&mut self, text: &str) {
        let size = self.layout.heading_font_size;
        let leading = size * LEADING;
        // keep the heading on the same page as the first line below it
        let next_line = self.layout.body_font_size * LEADING * 2.0;
        self.reserve(leading + HEADING_SPACE_AFTER + next_line);

        self.put_text(text, size, self.left(), self.cursor - size, false, TEXT);
        self.cursor -= leading + HEADING_SPACE_AFTER;
    }

    // ── Paragraph flow ────────────────────────────────────────────────────────

    /// `label` in bold followed by `value`, which wraps under itself.
    fn labeled_line(&mut self, label: &str, value: &str) {
        let size = self.layout.body_font_size;
        let leading = size * LEADING;
        let value_x = self.left() + text_width(label, size) + text_width(" ", size);
        let lines = wrap_text(value, chars_for(self.right() - value_x, size));

        for (i, line) in lines.iter().enumerate() {
            self.reserve(leading);
            let baseline = self.cursor - size;
            if i == 0 {
                self.put_text(label, size, self.left(), baseline, true, TEXT);
            }
            self.put_text(line, size, value_x, baseline, false, TEXT);
            self.cursor -= leading;
        }
    }

    fn paragraph(&mut self, text: &str, x: f32) {
        let size = self.layout.body_font_size;
        let leading = size * LEADING;
        for line in wrap_text(text, chars_for(self.right() - x, size)) {
            self.reserve(leading);
            self.put_text(&line, size, x, self.cursor - size, false, TEXT);
            self.cursor -= leading;
        }
    }

    fn dependency_block(&mut self, block: &DependencyBlock) {
        self.labeled_line("Dependency:", &block.reference);
        self.labeled_line("Depends On:", "");
        let indent = self.left() + INDENT;
        for item in &block.depends_on {
            self.paragraph(item, indent);
        }
        self.space(BLOCK_GAP);
    }

    // ── Tables ────────────────────────────────────────────────────────────────

    fn table(&mut self, table: &Table) {
        let style = TableStyle::for_kind(table.kind, self.layout);
        let widths = self.column_widths(table, style.font_size);
        let header = lay_out_row(&table.headers, &widths, style.font_size, HEADER_EXTRA_PAD);

        let first_row = table
            .rows
            .first()
            .map(|r| lay_out_row(r, &widths, style.font_size, 0.0).height)
            .unwrap_or(0.0);
        self.reserve(header.height + first_row);
        self.draw_row(&header, &widths, &style, true);

        for row in &table.rows {
            let laid = lay_out_row(row, &widths, style.font_size, 0.0);
            self.body_row(laid, &header, &widths, &style);
        }
    }

    /// Draw one body row, moving it to the next page when it does not fit.
    /// A row taller than a whole page is split between its wrapped lines.
    fn body_row(&mut self, mut row: LaidRow, header: &LaidRow, widths: &[f32], style: &TableStyle) {
        let line_h = style.font_size * LEADING;
        let page_room = self.top() - header.height - self.bottom();
        if self.cursor - row.height < self.bottom() && row.height <= page_room {
            self.table_page_break(header, widths, style);
        }

        while self.cursor - row.height < self.bottom() {
            let mut fit = self.lines_left(line_h);
            if fit == 0 {
                self.table_page_break(header, widths, style);
                fit = self.lines_left(line_h).max(1);
            }
            let Some(rest) = row.split_off(fit, line_h) else {
                break;
            };
            self.draw_row(&row, widths, style, false);
            row = rest;
            self.table_page_break(header, widths, style);
        }
        self.draw_row(&row, widths, style, false);
    }

    fn table_page_break(&mut self, header: &LaidRow, widths: &[f32], style: &TableStyle) {
        self.new_page();
        self.draw_row(header, widths, style, true);
    }

    /// Wrapped lines of a body row that still fit above the bottom margin.
    fn lines_left(&self, line_h: f32) -> usize {
        let room = self.cursor - self.bottom() - 2.0 * CELL_PAD_Y;
        (room / line_h).floor().max(0.0) as usize
    }

    fn column_widths(&self, table: &Table, font_size: f32) -> Vec<f32> {
        let natural: Vec<f32> = match table.kind {
            TableKind::Components => self.layout.component_columns.to_vec(),
            TableKind::KeyValue | TableKind::Counts => (0..table.headers.len())
                .map(|col| {
                    let widest = std::iter::once(&table.headers[col])
                        .chain(table.rows.iter().filter_map(|r| r.get(col)))
                        .map(|cell| text_width(cell, font_size))
                        .fold(MIN_COL_W, f32::max);
                    widest + 2.0 * CELL_PAD_X
                })
                .collect(),
        };
        fit_widths(&natural, self.frame_width())
    }

    /// Draw `row` with its top at the cursor and move the cursor below it.
    fn draw_row(&mut self, row: &LaidRow, widths: &[f32], style: &TableStyle, header: bool) {
        let top = self.cursor;
        let bottom = top - row.height;
        let left = self.left();
        let table_w: f32 = widths.iter().sum();
        let size = style.font_size;

        if header {
            fill_rect(&self.layer, left, bottom, table_w, row.height, HEADER_BG);
        } else if style.shaded_body {
            fill_rect(&self.layer, left, bottom, table_w, row.height, BODY_SHADE);
        }

        let color = if header { HEADER_FG } else { TEXT };
        let mut x = left;
        for (lines, w) in row.cells.iter().zip(widths) {
            for (j, line) in lines.iter().enumerate() {
                let baseline = top - CELL_PAD_Y - size - j as f32 * size * LEADING;
                let text_x = if style.centered {
                    x + ((w - text_width(line, size)) / 2.0).max(CELL_PAD_X)
                } else {
                    x + CELL_PAD_X
                };
                self.put_text(line, size, text_x, baseline, header, color);
            }
            x += w;
        }

        draw_hline(&self.layer, left, left + table_w, top);
        draw_hline(&self.layer, left, left + table_w, bottom);
        let mut edge = left;
        draw_vline(&self.layer, edge, bottom, top);
        for w in widths {
            edge += w;
            draw_vline(&self.layer, edge, bottom, top);
        }
        self.cursor = bottom;
    }

    fn put_text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, color: (f32, f32, f32)) {
        if text.is_empty() {
            return;
        }
        let font = if bold { &self.bold } else { &self.regular };
        set_color(&self.layer, color);
        self.layer.use_text(text, size, mm(x), mm(y), font);
        set_color(&self.layer, TEXT);
    }
}

fn lay_out_row(cells: &[String], widths: &[f32], size: f32, extra_pad: f32) -> LaidRow {
    let cells: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| wrap_text(cell, chars_for(w - 2.0 * CELL_PAD_X, size)))
        .collect();
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    LaidRow {
        height: 2.0 * CELL_PAD_Y + extra_pad + lines as f32 * size * LEADING,
        cells,
    }
}

/// Shrink `natural` widths to fit `available`. Columns narrower than an even
/// share keep their width; the wider ones give up space proportionally.
fn fit_widths(natural: &[f32], available: f32) -> Vec<f32> {
    let total: f32 = natural.iter().sum();
    if total <= available || natural.is_empty() {
        return natural.to_vec();
    }

    let share = available / natural.len() as f32;
    let fixed: f32 = natural.iter().filter(|w| **w <= share).sum();
    let room = available - fixed;
    let flexible = total - fixed;

    natural
        .iter()
        .map(|w| if *w <= share { *w } else { w * room / flexible })
        .collect()
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

fn render_err(e: impl std::fmt::Display) -> ConvertError {
    ConvertError::Render(e.to_string())
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(mm(x),     mm(y)),     false),
            (Point::new(mm(x + w), mm(y)),     false),
            (Point::new(mm(x + w), mm(y + h)), false),
            (Point::new(mm(x),     mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb(TEXT));
}

fn draw_segment(layer: &PdfLayerReference, from: (f32, f32), to: (f32, f32)) {
    layer.set_outline_color(rgb(GRID));
    layer.set_outline_thickness(GRID_W);
    layer.add_line(Line {
        points: vec![
            (Point::new(mm(from.0), mm(from.1)), false),
            (Point::new(mm(to.0), mm(to.1)), false),
        ],
        is_closed: false,
    });
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    draw_segment(layer, (x1, y), (x2, y));
}

fn draw_vline(layer: &PdfLayerReference, x: f32, y1: f32, y2: f32) {
    draw_segment(layer, (x, y1), (x, y2));
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH
}

/// How many average glyphs fit in `width` points.
fn chars_for(width: f32, size: f32) -> usize {
    ((width / (size * AVG_GLYPH)).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line (purls, hashes) are broken.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        for piece in split_long_word(word, max_chars) {
            let cur_len = current.chars().count();
            let piece_len = piece.chars().count();
            if current.is_empty() {
                current = piece;
            } else if cur_len + 1 + piece_len > max_chars {
                lines.push(std::mem::replace(&mut current, piece));
            } else {
                current.push(' ');
                current.push_str(&piece);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(max_chars).map(|c| c.iter().collect()).collect()
}
