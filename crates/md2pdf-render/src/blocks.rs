//! Markdown → flat list of styled blocks.
//!
//! pulldown-cmark yields a nested event stream. Layout only needs a flat
//! sequence of blocks, each carrying its indent depth and an optional list
//! marker, so this module walks the events once with an explicit frame stack.
//! Every `Start` pushes a frame and every `End` pops one, which keeps the
//! walker independent of the exact shape of pulldown-cmark's end tags.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Font variant a span is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl FontStyle {
    fn from_flags(strong: bool, emphasis: bool) -> Self {
        match (strong, emphasis) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Regular,
        }
    }

    /// The bold counterpart, used for headings and table headers.
    pub fn emboldened(self) -> Self {
        match self {
            FontStyle::Regular => FontStyle::Bold,
            FontStyle::Italic => FontStyle::BoldItalic,
            other => other,
        }
    }
}

/// A run of text in one font. May contain `'\n'` for hard line breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: FontStyle,
}

impl Span {
    fn new(text: impl Into<String>, style: FontStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Heading level 1–6.
    Heading(u8),
    Paragraph,
    /// Preformatted text; one span holding every line.
    Code,
    TableRow { header: bool },
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<Span>,
    /// Combined list and quote nesting depth.
    pub indent: usize,
    /// List or footnote marker drawn left of the first line.
    pub marker: Option<String>,
    pub quoted: bool,
}

impl Block {
    /// Concatenated text of every span.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Parse Markdown into blocks in document order.
pub fn parse(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;

    let mut walker = Walker::default();
    for event in Parser::new_ext(markdown, options) {
        walker.event(event);
    }
    walker.finish()
}

// ── Event walker ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum Frame {
    Paragraph,
    Heading(u8),
    Quote,
    List { next: Option<u64> },
    Item,
    Code,
    TableHead,
    TableRow,
    TableCell,
    Strong,
    Emphasis,
    /// `text_start` is the byte offset into the buffered inline text.
    Link { url: String, text_start: usize },
    Image,
    Other,
}

#[derive(Default)]
struct Walker {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    stack: Vec<Frame>,
    strong: usize,
    emphasis: usize,
    pending_marker: Option<String>,
    code: Option<String>,
    cells_in_row: usize,
}

impl Walker {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.spans.push(Span::new(code.to_string(), FontStyle::Mono)),
            Event::Html(html) | Event::InlineHtml(html) => {
                if !html.trim_start().starts_with("<!--") {
                    self.push_text(html.trim_end_matches('\n'));
                }
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.spans.push(Span::new("\n", FontStyle::Regular)),
            Event::Rule => {
                self.flush_inline();
                self.push_block(BlockKind::Rule, Vec::new());
            }
            Event::TaskListMarker(checked) => {
                let mark = if checked { "[x] " } else { "[ ] " };
                self.spans.push(Span::new(mark, FontStyle::Mono));
            }
            Event::FootnoteReference(label) => {
                self.spans
                    .push(Span::new(format!("[{label}]"), FontStyle::Regular));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.flush_inline();
                Frame::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush_inline();
                Frame::Heading(level as u8)
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                Frame::Quote
            }
            Tag::CodeBlock(_) => {
                self.flush_inline();
                self.code = Some(String::new());
                Frame::Code
            }
            Tag::List(start) => {
                self.flush_inline();
                Frame::List { next: start }
            }
            Tag::Item => {
                self.flush_inline();
                self.pending_marker = Some(self.next_list_marker());
                Frame::Item
            }
            Tag::FootnoteDefinition(label) => {
                self.flush_inline();
                self.pending_marker = Some(format!("[{label}]"));
                Frame::Item
            }
            Tag::Table(_) => {
                self.flush_inline();
                Frame::Other
            }
            Tag::TableHead => {
                self.cells_in_row = 0;
                Frame::TableHead
            }
            Tag::TableRow => {
                self.cells_in_row = 0;
                Frame::TableRow
            }
            Tag::TableCell => {
                if self.cells_in_row > 0 {
                    self.spans.push(Span::new(" | ", FontStyle::Regular));
                }
                self.cells_in_row += 1;
                Frame::TableCell
            }
            Tag::Strong => {
                self.strong += 1;
                Frame::Strong
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Frame::Emphasis
            }
            Tag::Link { dest_url, .. } => Frame::Link {
                url: dest_url.to_string(),
                text_start: self.inline_text().len(),
            },
            Tag::Image { .. } => {
                self.push_text("[image: ");
                Frame::Image
            }
            _ => Frame::Other,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph => self.flush_inline(),
            Frame::Heading(level) => {
                let spans = std::mem::take(&mut self.spans);
                self.push_block(BlockKind::Heading(level), spans);
            }
            Frame::Code => {
                let mut code = self.code.take().unwrap_or_default();
                if code.ends_with('\n') {
                    code.pop();
                }
                self.push_block(BlockKind::Code, vec![Span::new(code, FontStyle::Mono)]);
            }
            Frame::Item => {
                self.flush_inline();
                // Empty item: still draw the marker.
                if self.pending_marker.is_some() {
                    self.push_block(BlockKind::Paragraph, Vec::new());
                }
            }
            Frame::TableHead | Frame::TableRow => {
                let header = matches!(frame, Frame::TableHead);
                let spans = std::mem::take(&mut self.spans);
                self.push_block(BlockKind::TableRow { header }, spans);
            }
            Frame::Strong => self.strong = self.strong.saturating_sub(1),
            Frame::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            Frame::Link { url, text_start } => {
                let inline = self.inline_text();
                let text = inline.get(text_start..).unwrap_or_default();
                if !url.is_empty() && !url.starts_with('#') && text != url {
                    self.push_text(&format!(" ({url})"));
                }
            }
            Frame::Image => self.push_text("]"),
            Frame::Quote | Frame::List { .. } | Frame::TableCell | Frame::Other => {}
        }
    }

    fn next_list_marker(&mut self) -> String {
        let depth = self.list_depth();
        match self.stack.iter_mut().rev().find_map(|f| match f {
            Frame::List { next } => Some(next),
            _ => None,
        }) {
            Some(Some(n)) => {
                let marker = format!("{n}.");
                *n += 1;
                marker
            }
            _ if depth % 2 == 0 => "-".to_string(),
            _ => "\u{2022}".to_string(),
        }
    }

    fn list_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|f| matches!(f, Frame::List { .. }))
            .count()
    }

    fn inline_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn in_table_head(&self) -> bool {
        self.stack.iter().any(|f| matches!(f, Frame::TableHead))
    }

    fn push_text(&mut self, text: &str) {
        let mut style = FontStyle::from_flags(self.strong > 0, self.emphasis > 0);
        if self.in_table_head() {
            style = style.emboldened();
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style && last.text != "\n" => last.text.push_str(text),
            _ => self.spans.push(Span::new(text, style)),
        }
    }

    /// Emit buffered inline content as a paragraph.
    fn flush_inline(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        self.push_block(BlockKind::Paragraph, spans);
    }

    fn push_block(&mut self, kind: BlockKind, spans: Vec<Span>) {
        let quotes = self
            .stack
            .iter()
            .filter(|f| matches!(f, Frame::Quote))
            .count();
        self.blocks.push(Block {
            kind,
            spans,
            indent: self.list_depth() + quotes,
            marker: self.pending_marker.take(),
            quoted: quotes > 0,
        });
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inline();
        self.blocks
    }
}
