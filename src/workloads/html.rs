//! HTML parsing workloads.
//!
//! Three CPU-bound workloads over HTML-document strings: content-region
//! extraction, tag-name counting, and long-word counting. Each parses its
//! item independently with `scraper`, so items can be processed on any
//! worker with no shared state.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::trace;

use crate::error::{BenchError, Result};
use crate::workloads::Workload;

/// CSS selector for the wiki content region.
const CONTENT_SELECTOR: &str = "div#content";

/// Minimum word length counted by [`WordCount`].
const MIN_WORD_LEN: usize = 5;

/// Extracts the `div#content` region of an HTML document.
///
/// The result is the region's outer HTML as a JSON string, or JSON `null`
/// when the document has no such region.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContent;

impl Workload for ExtractContent {
    fn name(&self) -> &'static str {
        "extract-content"
    }

    fn run(&self, item: &str) -> Result<Value> {
        let document = Html::parse_document(item);
        let selector = Selector::parse(CONTENT_SELECTOR).unwrap();

        match document.select(&selector).next() {
            Some(region) => {
                trace!("extracted content region of {} bytes", region.html().len());
                Ok(Value::String(region.html()))
            }
            None => Ok(Value::Null),
        }
    }
}

/// Counts occurrences of every tag name in an HTML document.
///
/// The result is a JSON object mapping tag name to count. Items are parsed
/// as fragments so the counts cover only tags present in the input, not the
/// `html`/`head`/`body` shell the parser would otherwise synthesize.
#[derive(Debug, Clone, Copy)]
pub struct TagCount;

impl Workload for TagCount {
    fn name(&self) -> &'static str {
        "tag-count"
    }

    fn run(&self, item: &str) -> Result<Value> {
        let fragment = Html::parse_fragment(item);
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        // The fragment root is a synthetic element; count from its children.
        for child in fragment.root_element().children() {
            if let Some(element) = ElementRef::wrap(child) {
                count_tags(&element, &mut counts);
            }
        }

        serde_json::to_value(counts).map_err(|e| BenchError::workload(e.to_string()))
    }
}

/// Count an element and its descendants into `counts`.
fn count_tags(element: &ElementRef<'_>, counts: &mut BTreeMap<String, u64>) {
    *counts.entry(element.value().name().to_string()).or_insert(0) += 1;

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            count_tags(&child_element, counts);
        }
    }
}

/// Counts long lowercase words in an HTML document's visible text.
///
/// Text nodes are concatenated without separators (so a word spanning
/// adjacent inline elements stays one word), lowercased, and split into
/// runs of five or more ASCII letters; the result is a JSON object mapping
/// each word to its occurrence count.
#[derive(Debug, Clone, Copy)]
pub struct WordCount;

impl Workload for WordCount {
    fn name(&self) -> &'static str {
        "word-count"
    }

    fn run(&self, item: &str) -> Result<Value> {
        let document = Html::parse_document(item);
        let text = document
            .root_element()
            .text()
            .collect::<String>()
            .to_lowercase();

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for word in word_regex().find_iter(&text) {
            *counts.entry(word.as_str().to_string()).or_insert(0) += 1;
        }

        serde_json::to_value(counts).map_err(|e| BenchError::workload(e.to_string()))
    }
}

/// Compiled `[a-z]{5,}` matcher, built once per process.
fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(&format!("[a-z]{{{MIN_WORD_LEN},}}")).unwrap())
}
