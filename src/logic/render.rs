use anyhow::Result;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::model::{ComposedDocument, Party};

/// Turns a composed contract into document bytes
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &ComposedDocument) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    bold: bool,
}

/// Plain single-column PDF using the standard Helvetica faces
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Characters per line before wrapping
    pub wrap_width: usize,
    pub lines_per_page: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            wrap_width: 90,
            lines_per_page: 52,
        }
    }
}

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 11.0;
const LEADING: f32 = 14.0;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &ComposedDocument) -> Result<Vec<u8>> {
        let lines = self.layout(document);
        if self.lines_per_page == 0 {
            anyhow::bail!("lines_per_page must be positive");
        }
        let pages: Vec<&[Line]> = lines.chunks(self.lines_per_page).collect();
        Ok(write_pdf(&pages))
    }
}

impl PdfRenderer {
    fn push_heading(&self, lines: &mut Vec<Line>, text: &str) {
        lines.push(Line {
            text: String::new(),
            bold: false,
        });
        lines.push(Line {
            text: text.to_string(),
            bold: true,
        });
    }

    fn push_text(&self, lines: &mut Vec<Line>, text: &str) {
        for paragraph in text.lines() {
            for wrapped in wrap(paragraph, self.wrap_width) {
                lines.push(Line {
                    text: wrapped,
                    bold: false,
                });
            }
        }
    }

    fn push_party(&self, lines: &mut Vec<Line>, heading: &str, party: Party<'_>) {
        self.push_heading(lines, heading);
        self.push_text(lines, party.full_name);
        self.push_text(lines, &format!("Documento: {}", party.document));
        self.push_text(lines, &format!("Endereço: {}", party.address_line()));
    }

    fn layout(&self, document: &ComposedDocument) -> Vec<Line> {
        let submission = &document.submission;
        let mut lines = vec![Line {
            text: format!("CONTRATO - {}", document.template_label.to_uppercase()),
            bold: true,
        }];

        if !document.header_text.is_empty() {
            lines.push(Line {
                text: String::new(),
                bold: false,
            });
            self.push_text(&mut lines, &document.header_text);
        }

        self.push_party(
            &mut lines,
            "CONTRATANTE",
            submission.personal_customer_data.party(),
        );
        self.push_party(
            &mut lines,
            "CONTRATADA",
            submission.personal_provider_data.party(),
        );

        if !document.fields.is_empty() {
            self.push_heading(&mut lines, "ESCOPO");
            for field in &document.fields {
                self.push_text(&mut lines, &format!("{} {}", field.label, field.value));
            }
        }

        self.push_heading(&mut lines, "PRAZO E VALOR");
        self.push_text(&mut lines, &format!("Prazo: {}", submission.project_duration));
        self.push_text(&mut lines, &format!("Valor: {}", submission.project_value));

        if !document.content_text.is_empty() {
            self.push_heading(&mut lines, "CLÁUSULAS");
            self.push_text(&mut lines, &document.content_text);
        }

        if let Some(observation) = submission.observation.as_deref().filter(|o| !o.is_empty()) {
            self.push_heading(&mut lines, "OBSERVAÇÕES");
            self.push_text(&mut lines, observation);
        }

        lines
    }
}

/// Greedy word wrap; words longer than the width are split
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        let needed =
            current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Byte for `c` in the WinAnsi (Windows-1252) encoding used by the
/// standard PDF fonts; characters it cannot express become '?'
fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
        '\t' => b' ',
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

fn page_content(lines: &[Line]) -> Vec<u8> {
    let mut content = Content::new();
    content.begin_text();
    content.set_font(REGULAR, FONT_SIZE);
    content.set_leading(LEADING);
    content.next_line(MARGIN, PAGE_HEIGHT - MARGIN);

    let mut bold = false;
    for line in lines {
        if line.bold != bold {
            bold = line.bold;
            content.set_font(if bold { BOLD } else { REGULAR }, FONT_SIZE);
        }
        content.show(Str(&win_ansi(&line.text)));
        content.next_line_using_leading();
    }

    content.end_text();
    content.finish()
}

/// Assemble the pages into a PDF using the two standard Helvetica faces
fn write_pdf(pages: &[&[Line]]) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);

    let page_count = pages.len().max(1);
    // A (page, content stream) pair of ids per page
    let page_ids: Vec<(Ref, Ref)> = (0..page_count as i32)
        .map(|i| (Ref::new(5 + i * 2), Ref::new(6 + i * 2)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_count as i32);

    for (index, (page_id, content_id)) in page_ids.iter().enumerate() {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources()
            .fonts()
            .pair(REGULAR, regular_id)
            .pair(BOLD, bold_id);
        page.finish();

        let lines = pages.get(index).copied().unwrap_or(&[]);
        pdf.stream(*content_id, &page_content(lines));
    }

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.finish()
}
