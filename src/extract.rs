//! Extraction of the minimal chart markup from an exported figure.
//!
//! An export produced by the charting library wraps one container element,
//! tagged with a library specific class, and the inline script that draws into
//! it. Everything around that pair (document shell, library loader, config
//! snippets) is dropped.
//!
//! The export is parsed with `tl`. Elements are located in the tree, but the
//! returned markup is always the exact source text of each element.

use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::error::EmbedError;

/// The container element of a chart and the script that renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartMarkup {
    pub container: String,
    pub script: String,
}

/// Reads `path` and extracts its chart container and trailing script.
///
/// Returns [`EmbedError::MalformedExport`] when the expected structure is
/// missing and [`EmbedError::Io`] when the file cannot be read.
pub fn extract_chart_markup(
    path: &Path,
    container_class: &str,
) -> Result<ChartMarkup, EmbedError> {
    let html = fs::read_to_string(path).map_err(|e| EmbedError::io(path, e))?;

    extract_from_html(&html, container_class).map_err(|reason| EmbedError::MalformedExport {
        path: path.to_path_buf(),
        reason,
    })
}

/// Extracts the first `<div>` whose `class` lists `container_class`, together
/// with the first `<script>` element that follows it.
///
/// Both parts are returned as exact slices of `html`. The error is a
/// human-readable reason.
pub fn extract_from_html(html: &str, container_class: &str) -> Result<ChartMarkup, String> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|_| "the file could not be parsed as HTML".to_owned())?;
    let parser = dom.parser();

    let mut elements = Vec::new();
    for handle in dom.children() {
        collect_elements(html, *handle, parser, container_class, &mut elements);
    }

    let mut containers = elements
        .iter()
        .filter(|element| element.kind == ElementKind::Container);
    let container = containers
        .next()
        .ok_or_else(|| format!("no <div> with class \"{container_class}\" found"))?;

    let extra = containers.count();
    if extra > 0 {
        log::debug!("Export holds {extra} more chart container(s); using the first");
    }

    let script = elements
        .iter()
        .find(|element| {
            element.kind == ElementKind::Script && element.span.start >= container.span.end
        })
        .ok_or_else(|| {
            format!("no <script> element follows the \"{container_class}\" container")
        })?;

    Ok(ChartMarkup {
        container: html[container.span.clone()].to_owned(),
        script: html[script.span.clone()].to_owned(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Container,
    Script,
}

/// A located element and the byte range of its source text.
#[derive(Debug)]
struct Element {
    kind: ElementKind,
    span: Range<usize>,
}

/// Walks the tree in document order and records containers and scripts.
///
/// The content of `<script>` and `<style>` elements is not descended into.
fn collect_elements(
    html: &str,
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    container_class: &str,
    out: &mut Vec<Element>,
) {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    let name = tag.name().as_utf8_str();
    let is_raw_text = name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style");

    let kind = if name.eq_ignore_ascii_case("script") {
        Some(ElementKind::Script)
    } else if name.eq_ignore_ascii_case("div") && has_class(tag, container_class) {
        Some(ElementKind::Container)
    } else {
        None
    };

    if let Some(kind) = kind {
        match source_span(html, tag.raw().as_bytes()) {
            Some(span) => out.push(Element { kind, span }),
            None => log::debug!("Skipping <{name}> element without a source position"),
        }
    }

    if is_raw_text {
        return;
    }
    for child in tag.children().top().iter() {
        collect_elements(html, *child, parser, container_class, out);
    }
}

fn has_class(tag: &tl::HTMLTag, class: &str) -> bool {
    tag.attributes()
        .get("class")
        .flatten()
        .is_some_and(|value| value.as_utf8_str().split_ascii_whitespace().any(|c| c == class))
}

/// Byte range of `raw` inside `html`, when `raw` borrows from it.
fn source_span(html: &str, raw: &[u8]) -> Option<Range<usize>> {
    let base = html.as_ptr() as usize;
    let start = (raw.as_ptr() as usize).checked_sub(base)?;
    let end = start.checked_add(raw.len())?;
    (end <= html.len()).then_some(start..end)
}
