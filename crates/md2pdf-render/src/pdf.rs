//! Serialise a [`DocumentLayout`] with printpdf, then add the outline.

use printpdf::{
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    Point,
};

use crate::blocks::FontStyle;
use crate::layout::{pt_to_mm, DocumentLayout};
use crate::outline;
use crate::RenderError;

const LAYER: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Font(e.to_string()))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
            bold_italic: add(BuiltinFont::HelveticaBoldOblique)?,
            mono: add(BuiltinFont::Courier)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
            FontStyle::BoldItalic => &self.bold_italic,
            FontStyle::Mono => &self.mono,
        }
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt_to_mm(pt))
}

pub(crate) fn write_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let (width, height) = (mm(layout.width), mm(layout.height));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER);
    let fonts = Fonts::load(&doc)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for stroke in &page.strokes {
            layer.set_outline_color(Color::Greyscale(Greyscale::new(stroke.grey, None)));
            layer.set_outline_thickness(stroke.thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(stroke.from.0), mm(stroke.from.1)), false),
                    (Point::new(mm(stroke.to.0), mm(stroke.to.1)), false),
                ],
                is_closed: false,
            });
        }

        layer.set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
        for text in &page.texts {
            if text.text.is_empty() {
                continue;
            }
            layer.use_text(
                text.text.clone(),
                text.size,
                mm(text.x),
                mm(text.y),
                fonts.get(text.style),
            );
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    outline::attach(bytes, &layout.outline)
}
