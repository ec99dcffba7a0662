//! Pagination: place wrapped blocks onto fixed-size pages.
//!
//! All coordinates are PDF points with the origin at the bottom-left corner
//! of the page, matching what the writer expects. Layout is a pure function
//! of the blocks and options, so page counts and outline positions can be
//! tested without producing any PDF bytes.

use crate::blocks::{Block, BlockKind, FontStyle};
use crate::text::{self, Run};
use crate::{OutlineEntry, RenderOptions};

/// Horizontal indent per list or quote level.
const INDENT_STEP: f32 = 18.0;
/// Line height as a multiple of font size.
const LEADING: f32 = 1.35;
const FOOTER_SIZE: f32 = 9.0;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// A text run at an absolute position (baseline-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub style: FontStyle,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// A stroked line segment, used for rules, quote bars and code gutters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedStroke {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub thickness: f32,
    /// 0.0 = black, 1.0 = white.
    pub grey: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub texts: Vec<PlacedText>,
    pub strokes: Vec<PlacedStroke>,
}

impl PageLayout {
    fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.strokes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
    pub outline: Vec<OutlineEntry>,
    pub first_heading: Option<String>,
}

/// Size multiplier for heading levels 1–6.
fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 2.0,
        2 => 1.6,
        3 => 1.3,
        4 => 1.15,
        5 => 1.0,
        _ => 0.9,
    }
}

struct Cursor<'a> {
    options: &'a RenderOptions,
    width: f32,
    height: f32,
    margin: f32,
    pages: Vec<PageLayout>,
    /// Top of the next line, measured from the page bottom.
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        let (width, height) = options.page_size.dimensions_pt();
        let margin = mm_to_pt(options.margin_mm);
        Self {
            options,
            width,
            height,
            margin,
            pages: vec![PageLayout::default()],
            y: height - margin,
        }
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn page(&mut self) -> &mut PageLayout {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn at_page_top(&self) -> bool {
        self.y >= self.top()
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = self.top();
    }

    /// Start a new page unless `height` still fits above the bottom margin.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < self.margin && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Vertical gap before a block; swallowed at the top of a page.
    fn gap(&mut self, amount: f32) {
        if !self.at_page_top() {
            self.y -= amount;
        }
    }

    fn place_line(&mut self, runs: Vec<Run>, x: f32, size: f32) {
        let line_height = size * LEADING;
        self.ensure_space(line_height);
        let baseline = self.y - size;
        self.y -= line_height;
        let page = self.page();
        for run in runs {
            page.texts.push(PlacedText {
                text: run.text,
                style: run.style,
                size,
                x: x + run.x,
                y: baseline,
            });
        }
    }

    fn stroke(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, grey: f32) {
        self.page().strokes.push(PlacedStroke {
            from,
            to,
            thickness,
            grey,
        });
    }

    /// Draw a vertical bar beside lines placed since `(page, top)`.
    /// Lines that moved to a later page get their own bar there.
    fn bar_since(&mut self, page: usize, top: f32, x: f32, grey: f32) {
        let bottom = self.y;
        let last = self.page_index();
        for index in page..=last {
            let from_y = if index == page { top } else { self.top() };
            let to_y = if index == last { bottom } else { self.margin };
            if from_y > to_y {
                self.pages[index].strokes.push(PlacedStroke {
                    from: (x, from_y),
                    to: (x, to_y),
                    thickness: 1.5,
                    grey,
                });
            }
        }
    }
}

/// Lay out every section. Each section starts on a fresh page.
pub fn layout_document(sections: &[(Vec<Block>, bool)], options: &RenderOptions) -> DocumentLayout {
    let mut cursor = Cursor::new(options);
    let mut outline = Vec::new();
    let mut first_heading = None;

    for (i, (blocks, toc)) in sections.iter().enumerate() {
        if i > 0 && !cursor.page().is_empty() {
            cursor.new_page();
        }
        for (j, block) in blocks.iter().enumerate() {
            if let BlockKind::Heading(level) = block.kind {
                let title = block.plain_text().trim().to_string();
                let next = blocks.get(j + 1);
                place_heading(&mut cursor, block, level, next);
                if first_heading.is_none() && !title.is_empty() {
                    first_heading = Some(title.clone());
                }
                if *toc && level <= options.toc_level && !title.is_empty() {
                    // The heading's last line is on the current page.
                    outline.push(OutlineEntry {
                        title: text::sanitize(&title),
                        level,
                        page: cursor.page_index(),
                    });
                }
            } else {
                place_block(&mut cursor, block);
            }
        }
    }

    add_footers(&mut cursor);

    DocumentLayout {
        width: cursor.width,
        height: cursor.height,
        pages: cursor.pages,
        outline,
        first_heading,
    }
}

fn place_heading(cursor: &mut Cursor<'_>, block: &Block, level: u8, next: Option<&Block>) {
    let base = cursor.options.font_size;
    let size = base * heading_scale(level);
    let x = cursor.margin + block.indent as f32 * INDENT_STEP;
    let width = cursor.content_width() - block.indent as f32 * INDENT_STEP;
    let lines = text::wrap_spans(&block.spans, width, size, FontStyle::emboldened);

    cursor.gap(size * 0.8);
    // Keep the heading on the same page as the first line that follows it.
    let follower = if next.is_some() {
        size * 0.3 + base * (LEADING + 0.5)
    } else {
        0.0
    };
    cursor.ensure_space(lines.len() as f32 * size * LEADING + follower);
    for line in lines {
        cursor.place_line(line, x, size);
    }
    if level <= 2 {
        let y = cursor.y + size * 0.15;
        let (left, right) = (x, cursor.width - cursor.margin);
        cursor.stroke((left, y), (right, y), 0.5, 0.75);
    }
    cursor.y -= size * 0.3;
}

fn place_block(cursor: &mut Cursor<'_>, block: &Block) {
    let base = cursor.options.font_size;
    let indent = block.indent as f32 * INDENT_STEP;
    let x = cursor.margin + indent;
    let width = cursor.content_width() - indent;

    match block.kind {
        BlockKind::Rule => {
            cursor.gap(base * 0.6);
            cursor.ensure_space(base);
            let y = cursor.y - base * 0.5;
            let right = cursor.width - cursor.margin;
            cursor.stroke((x, y), (right, y), 0.75, 0.6);
            cursor.y -= base;
        }
        BlockKind::Code => {
            let size = base * 0.9;
            let pad = 8.0;
            cursor.gap(base * 0.5);
            let start = (cursor.page_index(), cursor.y);
            let code = block.plain_text();
            for line in text::wrap_preformatted(&code, width - pad, size) {
                let runs = if line.is_empty() {
                    Vec::new()
                } else {
                    vec![Run {
                        text: line,
                        style: FontStyle::Mono,
                        x: 0.0,
                    }]
                };
                cursor.place_line(runs, x + pad, size);
            }
            cursor.bar_since(start.0, start.1, x + 2.0, 0.8);
            cursor.y -= base * 0.3;
        }
        BlockKind::Paragraph | BlockKind::TableRow { .. } => {
            let header = matches!(block.kind, BlockKind::TableRow { header: true });
            let continues_table = matches!(block.kind, BlockKind::TableRow { header: false });
            if continues_table {
                cursor.gap(base * 0.15);
            } else {
                cursor.gap(base * 0.5);
            }
            let start = (cursor.page_index(), cursor.y);
            let lines = text::wrap_spans(&block.spans, width, base, |s| s);
            let mut first = true;
            for line in lines {
                let marker = if first { block.marker.clone() } else { None };
                first = false;
                cursor.place_line(line, x, base);
                if let Some(marker) = marker {
                    let marker = text::sanitize(&marker);
                    let marker_width = text::text_width(&marker, FontStyle::Regular, base);
                    let baseline = cursor.y + base * (LEADING - 1.0);
                    cursor.page().texts.push(PlacedText {
                        text: marker,
                        style: FontStyle::Regular,
                        size: base,
                        x: x - marker_width - 4.0,
                        y: baseline,
                    });
                }
            }
            if block.quoted {
                cursor.bar_since(start.0, start.1, x - INDENT_STEP + 6.0, 0.7);
            }
            if header {
                let y = cursor.y + base * 0.1;
                let right = cursor.width - cursor.margin;
                cursor.stroke((x, y), (right, y), 0.5, 0.5);
            }
        }
        BlockKind::Heading(level) => place_heading(cursor, block, level, None),
    }
}

fn add_footers(cursor: &mut Cursor<'_>) {
    let total = cursor.pages.len();
    let y = cursor.margin / 2.0;
    let center = cursor.width / 2.0;
    for (i, page) in cursor.pages.iter_mut().enumerate() {
        let label = format!("{} / {}", i + 1, total);
        let w = text::text_width(&label, FontStyle::Regular, FOOTER_SIZE);
        page.texts.push(PlacedText {
            text: label,
            style: FontStyle::Regular,
            size: FOOTER_SIZE,
            x: center - w / 2.0,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::parse;

    fn layout(md: &str) -> DocumentLayout {
        layout_document(&[(parse(md), true)], &RenderOptions::default())
    }

    fn body_texts(page: &PageLayout) -> Vec<&PlacedText> {
        // The footer is always last.
        page.texts[..page.texts.len() - 1].iter().collect()
    }

    #[test]
    fn unit_conversion_round_trips() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((pt_to_mm(mm_to_pt(20.0)) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn text_stays_inside_margins() {
        let md = "A paragraph that is long enough to wrap across several lines of the page. ".repeat(30);
        let doc = layout(&md);
        let margin = mm_to_pt(20.0);
        for page in &doc.pages {
            for t in body_texts(page) {
                assert!(t.x >= margin - 1e-3, "x={} left of margin", t.x);
                assert!(t.y >= margin - 1e-3, "y={} below margin", t.y);
                assert!(t.y <= doc.height - margin, "y={} above margin", t.y);
                let right = t.x + text::text_width(&t.text, t.style, t.size);
                assert!(right <= doc.width - margin + 1e-2, "run ends at {right}");
            }
        }
    }

    #[test]
    fn every_page_has_a_footer() {
        let md = "para\n\n".repeat(200);
        let doc = layout(&md);
        let total = doc.pages.len();
        assert!(total > 1);
        for (i, page) in doc.pages.iter().enumerate() {
            let footer = page.texts.last().unwrap();
            assert_eq!(footer.text, format!("{} / {}", i + 1, total));
        }
    }

    #[test]
    fn outline_points_at_heading_page() {
        let filler = "line\n\n".repeat(120);
        let md = format!("# Start\n\n{filler}## Later\n\ntext");
        let doc = layout(&md);
        assert_eq!(doc.outline.len(), 2);
        assert_eq!(doc.outline[0].page, 0);
        assert!(doc.outline[1].page > 0);
        let later_page = &doc.pages[doc.outline[1].page];
        assert!(later_page.texts.iter().any(|t| t.text == "Later"));
    }

    #[test]
    fn heading_is_not_orphaned_at_page_bottom() {
        // Fill the first page almost completely, then add a heading + paragraph.
        let mut md = String::new();
        for _ in 0..300 {
            md.push_str("x\n\n");
        }
        md.push_str("## Title\n\nBody after title");
        let doc = layout(&md);
        let page = doc
            .pages
            .iter()
            .find(|p| p.texts.iter().any(|t| t.text == "Title"))
            .unwrap();
        assert!(page.texts.iter().any(|t| t.text.contains("Body")));
    }

    #[test]
    fn list_marker_sits_left_of_text() {
        let doc = layout("- item text");
        let texts = body_texts(&doc.pages[0]);
        let marker = texts.iter().find(|t| t.text == "\u{2022}").unwrap();
        let body = texts.iter().find(|t| t.text == "item text").unwrap();
        assert!(marker.x < body.x);
        assert!((marker.y - body.y).abs() < 1e-3);
    }

    #[test]
    fn code_block_uses_mono_and_gutter() {
        let doc = layout("```\nlet x = 1;\n```");
        let page = &doc.pages[0];
        assert!(page
            .texts
            .iter()
            .any(|t| t.style == FontStyle::Mono && t.text == "let x = 1;"));
        assert_eq!(page.strokes.len(), 1);
    }

    #[test]
    fn largest_heading_fits_the_smallest_accepted_page() {
        // Letter has the smallest height/width gap; 95mm is about the widest
        // margin that still leaves 72pt of line width.
        let options = RenderOptions {
            page_size: crate::PageSize::Letter,
            margin_mm: 95.0,
            font_size: 72.0,
            ..RenderOptions::default()
        };
        options.validate().unwrap();
        assert!(RenderOptions {
            margin_mm: 95.5,
            ..options.clone()
        }
        .validate()
        .is_err());

        let doc = layout_document(&[(parse("# Tall heading\n\nbody"), true)], &options);
        let margin = mm_to_pt(options.margin_mm);
        let tallest = options.font_size * heading_scale(1) * LEADING;
        assert!(doc.height - 2.0 * margin > tallest);
        for page in &doc.pages {
            for t in body_texts(page) {
                assert!(t.y >= margin - 1e-3, "{:?} at y={} below margin", t.text, t.y);
            }
        }
    }

    #[test]
    fn empty_document_has_one_page() {
        let doc = layout("");
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.first_heading.is_none());
    }
}
