//! Glyph metrics, character sanitising and line wrapping.
//!
//! The base-14 fonts are encoded with WinAnsiEncoding, which covers ASCII and
//! Latin-1 plus a handful of typographic marks. Anything else must be mapped
//! before it reaches the PDF writer or it renders as garbage.

use crate::blocks::{FontStyle, Span};

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em (Adobe AFM).
/// Helvetica-Oblique shares these metrics.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Bold faces run wider; scaling the regular metrics over-estimates slightly,
/// which only ever wraps a line early.
const BOLD_SCALE: f32 = 1.1;

/// Courier is monospaced.
const COURIER_WIDTH: f32 = 0.6;

/// Width of `c` in em units.
pub fn glyph_width(c: char, style: FontStyle) -> f32 {
    if style == FontStyle::Mono {
        return COURIER_WIDTH;
    }
    let base = match c as u32 {
        code @ 32..=126 => f32::from(HELVETICA_WIDTHS[(code - 32) as usize]) / 1000.0,
        _ => 0.6,
    };
    match style {
        FontStyle::Bold | FontStyle::BoldItalic => base * BOLD_SCALE,
        _ => base,
    }
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, style: FontStyle, size: f32) -> f32 {
    text.chars().map(|c| glyph_width(c, style)).sum::<f32>() * size
}

/// Map text onto the WinAnsi repertoire.
///
/// Common typographic punctuation is transliterated to ASCII, Latin-1 is
/// kept, control characters are dropped, and everything else becomes `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' | '\u{00A0}'..='\u{00FF}' | '\u{2022}' => out.push(c),
            '\t' => out.push_str("    "),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2212}' => out.push('-'),
            '\u{2014}' | '\u{2015}' => out.push_str("--"),
            '\u{2026}' => out.push_str("..."),
            '\u{2192}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{21D2}' => out.push_str("=>"),
            '\u{2264}' => out.push_str("<="),
            '\u{2265}' => out.push_str(">="),
            '\u{2260}' => out.push_str("!="),
            '\u{2713}' | '\u{2714}' => out.push('x'),
            '\u{25E6}' | '\u{25AA}' | '\u{25CF}' => out.push('\u{2022}'),
            c if c.is_control() => {}
            _ => out.push('?'),
        }
    }
    out
}

/// A piece of a laid-out line: text in one font, offset from the line start.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: FontStyle,
    /// Horizontal offset from the start of the line, in points.
    pub x: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String, FontStyle),
    Space(FontStyle),
    Break,
}

fn tokenize(spans: &[Span], style_map: impl Fn(FontStyle) -> FontStyle) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        let style = style_map(span.style);
        for (i, segment) in span.text.split('\n').enumerate() {
            if i > 0 {
                tokens.push(Token::Break);
            }
            let segment = sanitize(segment);
            for (j, word) in segment.split(' ').enumerate() {
                if j > 0 {
                    tokens.push(Token::Space(style));
                }
                if !word.is_empty() {
                    tokens.push(Token::Word(word.to_string(), style));
                }
            }
        }
    }
    tokens
}

/// Build lines from runs, merging adjacent runs of the same font.
#[derive(Default)]
struct LineBuilder {
    lines: Vec<Vec<Run>>,
    current: Vec<Run>,
    x: f32,
}

impl LineBuilder {
    fn push(&mut self, text: &str, style: FontStyle, width: f32) {
        match self.current.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.current.push(Run {
                text: text.to_string(),
                style,
                x: self.x,
            }),
        }
        self.x += width;
    }

    fn break_line(&mut self) {
        if let Some(last) = self.current.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
        }
        self.current.retain(|r| !r.text.is_empty());
        self.lines.push(std::mem::take(&mut self.current));
        self.x = 0.0;
    }

    fn finish(mut self) -> Vec<Vec<Run>> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// Greedy word wrap of styled spans into lines no wider than `max_width`.
///
/// `style_map` lets headings and table headers force a bolder face without
/// rewriting the spans. Words longer than a whole line are split by
/// character. Always returns at least one (possibly empty) line.
pub fn wrap_spans(
    spans: &[Span],
    max_width: f32,
    size: f32,
    style_map: impl Fn(FontStyle) -> FontStyle,
) -> Vec<Vec<Run>> {
    let mut builder = LineBuilder::default();
    let mut pending_space: Option<FontStyle> = None;

    for token in tokenize(spans, style_map) {
        match token {
            Token::Break => {
                pending_space = None;
                builder.break_line();
            }
            Token::Space(style) => {
                if builder.x > 0.0 {
                    pending_space = Some(style);
                }
            }
            Token::Word(word, style) => {
                let word_width = text_width(&word, style, size);
                let space_width = pending_space
                    .map(|s| text_width(" ", s, size))
                    .unwrap_or(0.0);

                if builder.x > 0.0 && builder.x + space_width + word_width > max_width {
                    builder.break_line();
                } else if let Some(space_style) = pending_space {
                    builder.push(" ", space_style, space_width);
                }
                pending_space = None;

                if word_width <= max_width {
                    builder.push(&word, style, word_width);
                    continue;
                }
                // Overlong word: hard-split at the line width.
                let mut chunk = String::new();
                let mut chunk_width = 0.0;
                for c in word.chars() {
                    let w = glyph_width(c, style) * size;
                    if builder.x + chunk_width + w > max_width && !(builder.x == 0.0 && chunk.is_empty()) {
                        builder.push(&chunk, style, chunk_width);
                        builder.break_line();
                        chunk.clear();
                        chunk_width = 0.0;
                    }
                    chunk.push(c);
                    chunk_width += w;
                }
                if !chunk.is_empty() {
                    builder.push(&chunk, style, chunk_width);
                }
            }
        }
    }
    builder.finish()
}

/// Split preformatted text into lines, hard-wrapping any that overflow.
/// Leading whitespace is preserved.
pub fn wrap_preformatted(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let per_line = ((max_width / (COURIER_WIDTH * size) + 1e-3).floor() as usize).max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let line = sanitize(raw);
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(per_line) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> Span {
        Span {
            text: text.into(),
            style: FontStyle::Regular,
        }
    }

    fn line_text(line: &[Run]) -> String {
        line.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn widths_follow_afm_metrics() {
        assert!((glyph_width('m', FontStyle::Regular) - 0.833).abs() < 1e-6);
        assert!((glyph_width('i', FontStyle::Regular) - 0.222).abs() < 1e-6);
        assert!(glyph_width('m', FontStyle::Bold) > glyph_width('m', FontStyle::Regular));
        assert_eq!(glyph_width('i', FontStyle::Mono), glyph_width('m', FontStyle::Mono));
        assert!((text_width("ab", FontStyle::Mono, 10.0) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn sanitize_maps_typography() {
        assert_eq!(sanitize("\u{201C}hi\u{201D} \u{2014} it\u{2019}s\u{2026}"), "\"hi\" -- it's...");
        assert_eq!(sanitize("caf\u{e9}"), "caf\u{e9}");
        assert_eq!(sanitize("\u{4e2d}"), "?");
        assert_eq!(sanitize("a\u{7}b"), "ab");
        assert_eq!(sanitize("\tx"), "    x");
    }

    #[test]
    fn short_text_fits_one_line() {
        let lines = wrap_spans(&[span("hello world")], 500.0, 11.0, |s| s);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "hello world");
    }

    #[test]
    fn long_text_wraps_on_spaces() {
        let text = "word ".repeat(50);
        let lines = wrap_spans(&[span(&text)], 100.0, 11.0, |s| s);
        assert!(lines.len() > 5);
        for line in &lines {
            let t = line_text(line);
            assert!(!t.starts_with(' ') && !t.ends_with(' '), "got {t:?}");
            assert!(text_width(&t, FontStyle::Regular, 11.0) <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn overlong_word_is_split() {
        let lines = wrap_spans(&[span(&"x".repeat(200))], 50.0, 10.0, |s| s);
        assert!(lines.len() > 1);
        let total: usize = lines.iter().map(|l| line_text(l).len()).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn hard_breaks_start_new_lines() {
        let lines = wrap_spans(&[span("one\ntwo")], 500.0, 11.0, |s| s);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[1]), "two");
    }

    #[test]
    fn runs_keep_styles_and_offsets() {
        let spans = vec![
            span("plain "),
            Span {
                text: "bold".into(),
                style: FontStyle::Bold,
            },
        ];
        let lines = wrap_spans(&spans, 500.0, 10.0, |s| s);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[0][0].x, 0.0);
        assert!(lines[0][1].x > 0.0);
        assert_eq!(lines[0][1].style, FontStyle::Bold);
    }

    #[test]
    fn style_map_applies() {
        let lines = wrap_spans(&[span("heading")], 500.0, 10.0, FontStyle::emboldened);
        assert_eq!(lines[0][0].style, FontStyle::Bold);
    }

    #[test]
    fn empty_input_yields_one_empty_line() {
        let lines = wrap_spans(&[], 500.0, 10.0, |s| s);
        assert_eq!(lines, vec![Vec::<Run>::new()]);
    }

    #[test]
    fn preformatted_preserves_indent_and_wraps() {
        let lines = wrap_preformatted("    indented\n\nshort", 600.0, 10.0);
        assert_eq!(lines, vec!["    indented", "", "short"]);
        let wrapped = wrap_preformatted(&"a".repeat(25), 60.0, 10.0);
        assert_eq!(wrapped, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }
}
