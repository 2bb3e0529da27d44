//! # PDF Serializer
//!
//! Writes a laid-out `Document` as a PDF 1.7 byte stream.
//!
//! Only the two standard Helvetica faces are used, so fonts are plain Type1
//! references with WinAnsiEncoding and nothing is embedded. Each page gets one
//! Flate-compressed content stream.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj Catalog      2 0 obj Pages
//! 3.. 0 obj fonts      then per page: content stream, page dict
//! info dict
//! xref / trailer / startxref / %%EOF
//! ```

pub mod encoding;

use std::collections::BTreeSet;
use std::io::Write as IoWrite;

use chrono::{DateTime, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::layout::{Document, Page, StandardFont};
use crate::pdf::encoding::{encode_info_string, encode_literal};

pub const PRODUCER: &str = concat!("resume-report-api ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("character {ch:?} cannot be encoded in a standard font")]
    UnencodableChar { ch: char },

    #[error("cannot compose document: {0}")]
    Compose(String),
}

/// Document-level metadata written to the Info dictionary.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Metadata {
    pub fn for_document(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Tracks allocated PDF objects while writing. Index 0 is the free-list head.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: vec![Vec::new()],
        }
    }

    /// Reserves an object id to be filled later.
    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len() - 1
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    fn set(&mut self, id: usize, data: Vec<u8>) {
        self.objects[id] = data;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfWriter;

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, document: &Document, metadata: &Metadata) -> Result<Vec<u8>, PdfError> {
        if document.pages().is_empty() {
            return Err(PdfError::Compose("document has no pages".to_string()));
        }

        let mut builder = PdfBuilder::new();
        let catalog_id = builder.reserve();
        let pages_id = builder.reserve();

        let fonts = used_fonts(document);
        let font_ids: Vec<(StandardFont, usize)> = fonts
            .iter()
            .map(|font| {
                let dict = format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                );
                (*font, builder.push(dict.into_bytes()))
            })
            .collect();
        let font_resources: String = font_ids
            .iter()
            .enumerate()
            .map(|(i, (_, id))| format!("/F{i} {id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::with_capacity(document.page_count());
        for page in document.pages() {
            let content = content_stream(page, &font_ids)?;
            let compressed = compress_to_vec_zlib(&content, 6);

            let mut stream = Vec::with_capacity(compressed.len() + 64);
            let _ = write!(
                stream,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            stream.extend_from_slice(&compressed);
            stream.extend_from_slice(b"\nendstream");
            let content_id = builder.push(stream);

            let page_dict = format!(
                "<< /Type /Page /Parent {pages_id} 0 R /MediaBox [0 0 {} {}] \
                 /Contents {content_id} 0 R /Resources << /Font << {font_resources} >> >> >>",
                fmt_num(page.width),
                fmt_num(page.height),
            );
            page_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.set(
            catalog_id,
            format!("<< /Type /Catalog /Pages {pages_id} 0 R >>").into_bytes(),
        );
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        builder.set(
            pages_id,
            format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", page_ids.len()).into_bytes(),
        );

        let mut info = Vec::new();
        info.extend_from_slice(b"<< /Title (");
        info.extend_from_slice(&encode_info_string(&metadata.title));
        info.extend_from_slice(b") /Producer (");
        info.extend_from_slice(&encode_info_string(PRODUCER));
        let _ = write!(
            info,
            ") /CreationDate (D:{}Z) >>",
            metadata.created_at.format("%Y%m%d%H%M%S")
        );
        let info_id = builder.push(info);

        let bytes = serialize(&builder, catalog_id, info_id);
        debug!(
            pages = page_ids.len(),
            bytes = bytes.len(),
            "PDF serialized"
        );
        Ok(bytes)
    }
}

/// Fonts referenced by any draw, in a stable order. Helvetica is always present.
fn used_fonts(document: &Document) -> BTreeSet<StandardFont> {
    let mut fonts: BTreeSet<StandardFont> = document
        .pages()
        .iter()
        .flat_map(|p| p.draws().iter().map(|d| d.font))
        .collect();
    fonts.insert(StandardFont::Helvetica);
    fonts
}

fn content_stream(page: &Page, font_ids: &[(StandardFont, usize)]) -> Result<Vec<u8>, PdfError> {
    let mut out = Vec::new();
    out.extend_from_slice(b"0 0 0 rg\n");
    for draw in page.draws() {
        let font_index = font_ids
            .iter()
            .position(|(f, _)| *f == draw.font)
            .ok_or_else(|| PdfError::Compose(format!("font {:?} not registered", draw.font)))?;
        let _ = write!(
            out,
            "BT\n/F{font_index} {} Tf\n{} {} Td\n(",
            fmt_num(draw.size),
            fmt_num(draw.x),
            fmt_num(draw.y)
        );
        out.extend_from_slice(&encode_literal(&draw.text)?);
        out.extend_from_slice(b") Tj\nET\n");
    }
    Ok(out)
}

/// Formats a coordinate without trailing zeros (`742`, `60.5`).
fn fmt_num(value: f32) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn serialize(builder: &PdfBuilder, root_id: usize, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{i} 0 obj\n");
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    output.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{offset:010} 00000 n \n");
    }

    let id = Uuid::new_v4().simple().to_string();
    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root {root_id} 0 R /Info {info_id} 0 R /ID [<{id}> <{id}>] >>\n\
         startxref\n{xref_offset}\n%%EOF\n",
        builder.objects.len()
    );

    output
}
