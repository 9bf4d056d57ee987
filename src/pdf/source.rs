//! Turns report text into Typst source.
//!
//! Headings are recognised with a simple heuristic: a line starting with `#`
//! (level = number of `#`), or a short line ending in a colon. Everything else
//! is paragraph text, split on blank lines. All text is emitted as escaped
//! Typst string literals so report content can never be read as markup.

use lazy_static::lazy_static;
use regex::Regex;

/// Longest line (in characters) still treated as a colon heading.
pub const MAX_COLON_HEADING_CHARS: usize = 80;

lazy_static! {
    static ref HASH_HEADING: Regex = Regex::new(r"^(#+)\s*(.*?)\s*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(Vec<String>),
}

fn colon_heading(line: &str) -> Option<&str> {
    let text = line.strip_suffix(':')?.trim_end();
    if text.is_empty() || line.chars().count() > MAX_COLON_HEADING_CHARS {
        return None;
    }
    Some(text)
}

fn flush(paragraph: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

/// Split report text into headings and paragraphs.
pub fn parse_blocks(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();

    for raw in body.lines() {
        let line = raw.trim();
        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(caps) = HASH_HEADING.captures(line) {
            flush(&mut paragraph, &mut blocks);
            let text = caps.get(2).map_or("", |m| m.as_str());
            if !text.is_empty() {
                let hashes = caps.get(1).map_or(1, |m| m.as_str().len());
                blocks.push(Block::Heading {
                    level: hashes.clamp(1, 3) as u8,
                    text: text.to_string(),
                });
            }
            continue;
        }

        if let Some(text) = colon_heading(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level: 1,
                text: text.to_string(),
            });
            continue;
        }

        paragraph.push(line.to_string());
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str(r#"\""#),
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                out.push_str(&format!(
                    "#heading(level: {})[#\"{}\"]\n\n",
                    level,
                    escape_typst_string(text)
                ));
            }
            Block::Paragraph(lines) => {
                let joined = lines
                    .iter()
                    .map(|line| format!("#\"{}\"", escape_typst_string(line)))
                    .collect::<Vec<_>>()
                    .join("#linebreak()");
                out.push_str(&joined);
                out.push_str("\n\n");
            }
        }
    }
    out
}

/// Complete Typst document: the layout template, the title block, then the
/// body blocks.
pub fn build_report_source(
    template: &str,
    topic: &str,
    author: &str,
    date: &str,
    body: &str,
) -> String {
    format!(
        "{template}\n\n#show: report.with(\n  title: \"{title}\",\n  author: \"{author}\",\n  date: \"{date}\",\n)\n\n{body}",
        template = template.trim_end(),
        title = escape_typst_string(topic),
        author = escape_typst_string(author),
        date = escape_typst_string(date),
        body = render_blocks(&parse_blocks(body)),
    )
}
