//! # PDF snapshot backend
//!
//! Writes a page scene as a single-page vector PDF. Paths become PDF path
//! operators and text uses the standard base fonts, so no font data is
//! embedded and the output is resolution independent.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj  Catalog
//! 2 0 obj  Pages
//! 3..6     Base fonts (F0 Helvetica, F1 bold, F2 oblique, F3 Courier)
//! 7 0 obj  Content stream (FlateDecode)
//! 8 0 obj  Page
//! 9 0 obj  Info
//! xref / trailer
//! ```

use crate::export::{BoxFuture, SnapshotRenderer, SnapshotRequest};
use crate::renderer::{DrawCommand, FontStyle, RenderResult, RendererError, Scene};
use kurbo::{Affine, BezPath, PathEl, Point};
use miniz_oxide::deflate::compress_to_vec_zlib;
use peniko::Color;
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

/// Base fonts in resource order.
const BASE_FONTS: [&str; 4] = ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique", "Courier"];

/// zlib level for content streams.
const COMPRESSION_LEVEL: u8 = 6;

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Regular => "F0",
        FontStyle::Bold => "F1",
        FontStyle::Italic => "F2",
        FontStyle::Mono => "F3",
    }
}

/// Vector PDF writer.
#[derive(Debug, Clone, Default)]
pub struct PdfSnapshot {
    /// Written to the document info dictionary.
    title: Option<String>,
}

impl PdfSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialize a request synchronously.
    pub fn render(&self, request: &SnapshotRequest) -> RenderResult<Vec<u8>> {
        let size = request.scene.size;
        if !(size.width.is_finite()
            && size.height.is_finite()
            && size.width > 0.0
            && size.height > 0.0)
        {
            return Err(RendererError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        if !(request.scale.is_finite() && request.scale > 0.0) {
            return Err(RendererError::InvalidScale(request.scale));
        }

        let content = build_content_stream(&request.scene);
        let compressed = compress_to_vec_zlib(content.as_bytes(), COMPRESSION_LEVEL);
        log::debug!(
            "PDF content stream: {} bytes, {} compressed",
            content.len(),
            compressed.len()
        );

        let mut objects: Vec<Vec<u8>> = Vec::new();
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        objects.push(b"<< /Type /Pages /Kids [8 0 R] /Count 1 >>".to_vec());
        for font in BASE_FONTS {
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font
                )
                    .into_bytes(),
            );
        }

        let mut stream: Vec<u8> = Vec::new();
        let _ = write!(stream, "<< /Length {} /Filter /FlateDecode >>\nstream\n", compressed.len());
        stream.extend_from_slice(&compressed);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);

        let fonts: String = BASE_FONTS
            .iter()
            .enumerate()
            .map(|(i, _)| format!("/F{} {} 0 R", i, i + 3))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents 7 0 R \
                 /Resources << /Font << {} >> >> >>",
                size.width, size.height, fonts
            )
            .into_bytes(),
        );

        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("SlideGrid {}", request.format));
        objects.push(
            format!(
                "<< /Title ({}) /Producer (SlideGrid) /Creator (SlideGrid) >>",
                escape_pdf_string(&title)
            )
            .into_bytes(),
        );

        Ok(serialize(&objects, objects.len()))
    }
}

impl SnapshotRenderer for PdfSnapshot {
    fn snapshot<'a>(
        &'a self,
        request: &'a SnapshotRequest,
    ) -> BoxFuture<'a, RenderResult<Vec<u8>>> {
        Box::pin(async move { self.render(request) })
    }
}

/// Write objects (numbered from 1) with header, xref table and trailer.
fn serialize(objects: &[Vec<u8>], info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets = Vec::with_capacity(objects.len());

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in objects.iter().enumerate() {
        offsets.push(output.len());
        let _ = write!(output, "{} 0 obj\n", i + 1);
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", objects.len() + 1);
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in &offsets {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        info_id,
        xref_offset
    );
    output
}

/// Build the page content stream. PDF space has its origin at the bottom
/// left, so every coordinate is flipped against the page height.
fn build_content_stream(scene: &Scene) -> String {
    let flip = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, scene.size.height]);
    let to_pdf = flip * scene.transform;
    let text_scale = scene.transform.determinant().abs().sqrt();
    let mut stream = String::new();

    for command in &scene.commands {
        match command {
            DrawCommand::Fill { path, color } => {
                let (r, g, b) = flatten(*color);
                let _ = writeln!(stream, "q\n{:.3} {:.3} {:.3} rg", r, g, b);
                write_path(&mut stream, &(to_pdf * path.clone()));
                stream.push_str("f\nQ\n");
            }
            DrawCommand::Stroke { path, color, width } => {
                let (r, g, b) = flatten(*color);
                let _ = writeln!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n1 J 1 j",
                    r,
                    g,
                    b,
                    width * text_scale
                );
                write_path(&mut stream, &(to_pdf * path.clone()));
                stream.push_str("S\nQ\n");
            }
            DrawCommand::Text {
                origin,
                text,
                size,
                color,
                style,
            } => {
                let (r, g, b) = flatten(*color);
                let origin = to_pdf * *origin;
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    r,
                    g,
                    b,
                    font_resource(*style),
                    size * text_scale,
                    origin.x,
                    origin.y,
                    encode_text(text)
                );
            }
        }
    }
    stream
}

fn write_path(stream: &mut String, path: &BezPath) {
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                let _ = writeln!(stream, "{:.2} {:.2} m", p.x, p.y);
                current = p;
                start = p;
            }
            PathEl::LineTo(p) => {
                let _ = writeln!(stream, "{:.2} {:.2} l", p.x, p.y);
                current = p;
            }
            PathEl::QuadTo(q, p) => {
                // Degree elevation to a cubic.
                let c1 = current + (q - current) * (2.0 / 3.0);
                let c2 = p + (q - p) * (2.0 / 3.0);
                let _ = writeln!(
                    stream,
                    "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                );
                current = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                let _ = writeln!(
                    stream,
                    "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                    c1.x, c1.y, c2.x, c2.y, p.x, p.y
                );
                current = p;
            }
            PathEl::ClosePath => {
                stream.push_str("h\n");
                current = start;
            }
        }
    }
}

/// RGB with alpha composited over white; the page is opaque white.
fn flatten(color: Color) -> (f32, f32, f32) {
    let [r, g, b, a] = color.components;
    let a = a.clamp(0.0, 1.0);
    let over_white = |c: f32| c * a + (1.0 - a);
    (over_white(r), over_white(g), over_white(b))
}

/// Escape special characters in a PDF string.
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Encode text for a WinAnsi base font. Latin-1 characters above ASCII are
/// written as octal escapes, anything else becomes `?`.
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}
