//! `asp-embed` turns a static slide export into a self-contained interactive
//! document.
//!
//! Two passes run over the raw HTML text of the export:
//!
//! * [`inject::inject_script`] makes the Plotly library available, either
//!   inlined right after `<head>` or written next to the document and linked.
//! * [`replace::replace_placeholders`] swaps every image announced by a marker
//!   comment such as `<!-- asp: charts/fig1.html -->` for the chart container
//!   of that exported figure, and appends the figure's script before `</body>`.
//!
//! [`pipeline::process`] chains both passes with entity decoding and writes
//! `<name>_embedded.html` next to the input.
//!
//! # Example
//!
//! ```rust
//! use asp_embed::HtmlDocument;
//!
//! # fn demo() -> Result<(), asp_embed::error::EmbedError> {
//! let mut document = HtmlDocument::new("<html><head></head><body></body></html>");
//! document.insert_after_head("<meta charset=\"utf-8\">")?;
//! document.insert_before_body_close("<script>start()</script>")?;
//!
//! assert_eq!(
//!     document.as_str(),
//!     "<html><head>\n<meta charset=\"utf-8\"></head><body><script>start()</script>\n</body></html>"
//! );
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod inject;
pub mod marker;
pub mod pipeline;
pub mod release;
pub mod replace;
pub mod source;

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::EmbedError;

static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("head pattern is valid"));

static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("body pattern is valid"));

/// The full text of an HTML file, edited in place by pattern-based passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    content: String,
}

impl HtmlDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Reads a document from disk.
    pub fn load(path: &Path) -> Result<Self, EmbedError> {
        let content = fs::read_to_string(path).map_err(|e| EmbedError::io(path, e))?;
        Ok(Self::new(content))
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Byte offset right after the first opening `<head>` tag.
    ///
    /// Matches `<head>` with or without attributes in any letter case, but not
    /// `<header>`.
    pub fn head_insertion_point(&self) -> Result<usize, EmbedError> {
        HEAD_OPEN
            .find(&self.content)
            .map(|m| m.end())
            .ok_or(EmbedError::MissingInsertionPoint { tag: "<head>" })
    }

    /// Byte offset of the last closing `</body>` tag.
    pub fn body_close_position(&self) -> Result<usize, EmbedError> {
        BODY_CLOSE
            .find_iter(&self.content)
            .last()
            .map(|m| m.start())
            .ok_or(EmbedError::MissingInsertionPoint { tag: "</body>" })
    }

    /// Inserts a newline and `snippet` right after the opening `<head>` tag.
    ///
    /// Fails without touching the document when there is no `<head>` tag.
    /// Calling this twice inserts the snippet twice.
    pub fn insert_after_head(&mut self, snippet: &str) -> Result<(), EmbedError> {
        let at = self.head_insertion_point()?;
        self.content.insert_str(at, &format!("\n{snippet}"));
        Ok(())
    }

    /// Inserts `snippet` and a newline right before the closing `</body>` tag.
    pub fn insert_before_body_close(&mut self, snippet: &str) -> Result<(), EmbedError> {
        let at = self.body_close_position()?;
        self.content.insert_str(at, &format!("{snippet}\n"));
        Ok(())
    }

    /// Decodes every HTML character reference in the document following the
    /// HTML5 rules for text content: legacy names without a trailing `;` are
    /// expanded and numeric references are remapped like a browser does.
    pub fn unescape_entities(&mut self) {
        let decoded = htmlize::unescape(self.content.as_str()).into_owned();
        self.content = decoded;
    }

    pub(crate) fn replace_content(&mut self, content: String) {
        self.content = content;
    }
}
