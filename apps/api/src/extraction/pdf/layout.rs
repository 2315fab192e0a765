//! Layout-aware extraction: positioned text fragments, re-ordered top-to-bottom
//! then left-to-right before being joined.

use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use bytes::Bytes;
use pdf_extract::{output_doc, Document, MediaBox, OutputDev, OutputError, Transform};

use super::{ExtractionStrategy, StrategyError, MIN_CANDIDATE_CHARS};
use crate::extraction::text::{char_len, has_readable_words, normalize_lines};

/// Fragments whose baselines differ by at most this much share a line.
const SAME_LINE_TOLERANCE: f64 = 5.0;
/// A vertical jump larger than this between consecutive fragments starts a new line.
const LINE_BREAK_THRESHOLD: f64 = 10.0;

/// A run of text shown by a single text-showing operator, positioned by its
/// first glyph (PDF user space, y grows upwards).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Collects fragments per page from the PDF content streams.
#[derive(Default)]
struct FragmentCollector {
    pages: Vec<Vec<Fragment>>,
    page: Vec<Fragment>,
    current: Option<Fragment>,
}

impl FragmentCollector {
    fn flush(&mut self) {
        if let Some(fragment) = self.current.take() {
            if !fragment.text.trim().is_empty() {
                self.page.push(fragment);
            }
        }
    }
}

impl OutputDev for FragmentCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.page.clear();
        self.current = None;
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.flush();
        self.pages.push(std::mem::take(&mut self.page));
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        _width: f64,
        _spacing: f64,
        _font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        match self.current.as_mut() {
            Some(fragment) => fragment.text.push_str(char),
            None => {
                self.current = Some(Fragment {
                    text: char.to_string(),
                    x: trm.m31,
                    y: trm.m32,
                })
            }
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

/// Orders a page's fragments into reading order and joins them.
pub(crate) fn assemble_page(mut fragments: Vec<Fragment>) -> String {
    fragments.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    for fragment in fragments {
        match lines.last_mut() {
            Some(line) if (line[0].y - fragment.y).abs() <= SAME_LINE_TOLERANCE => {
                line.push(fragment)
            }
            _ => lines.push(vec![fragment]),
        }
    }

    let mut page = String::new();
    let mut last_y: Option<f64> = None;
    for mut line in lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
        for fragment in line {
            if let Some(prev) = last_y {
                if (fragment.y - prev).abs() > LINE_BREAK_THRESHOLD {
                    page.push('\n');
                }
            }
            if !page.is_empty() && !page.ends_with('\n') && !page.ends_with(' ') {
                page.push(' ');
            }
            page.push_str(&fragment.text);
            last_y = Some(fragment.y);
        }
    }
    page
}

pub(crate) fn assemble_document(pages: Vec<Vec<Fragment>>) -> String {
    let mut full = String::new();
    for page in pages {
        full.push_str(&assemble_page(page));
        full.push_str("\n\n");
    }
    normalize_lines(&full)
}

fn layout_text(pdf: &[u8]) -> Result<String, StrategyError> {
    let doc = Document::load_mem(pdf).map_err(|e| StrategyError::Parse(e.to_string()))?;

    let mut collector = FragmentCollector::default();
    output_doc(&doc, &mut collector).map_err(|e| StrategyError::Parse(e.to_string()))?;

    let text = assemble_document(collector.pages);
    let len = char_len(&text);
    if len < MIN_CANDIDATE_CHARS {
        return Err(StrategyError::InsufficientText(len));
    }
    if !has_readable_words(&text) {
        return Err(StrategyError::Unreadable);
    }
    Ok(text)
}

/// Strategy 1: parse the PDF and rebuild reading order from glyph positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutStrategy;

#[async_trait]
impl ExtractionStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "pdf_layout"
    }

    async fn extract(&self, pdf: &Bytes) -> Result<String, StrategyError> {
        let pdf = pdf.clone();
        // pdf-extract panics on some malformed fonts; treat that as a failed attempt.
        tokio::task::spawn_blocking(move || {
            catch_unwind(AssertUnwindSafe(|| layout_text(&pdf))).unwrap_or(Err(StrategyError::Panicked))
        })
        .await?
    }
}
