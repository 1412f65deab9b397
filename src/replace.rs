//! Substitution of placeholder images with exported chart markup.

use std::ops::Range;
use std::path::Path;

use crate::config::PlaceholderSettings;
use crate::error::EmbedError;
use crate::extract::extract_chart_markup;
use crate::marker::find_placeholders;
use crate::HtmlDocument;

/// Outcome of a placeholder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Placeholders whose image was swapped for a chart.
    pub replaced: usize,
    /// Placeholders left as is because the chart file does not exist.
    pub missing: usize,
    /// Placeholders left as is because the chart file has no usable chart markup.
    pub malformed: usize,
}

/// Replaces every resolvable placeholder image with its chart container and
/// appends the chart scripts before `</body>`.
///
/// Chart paths are resolved against `path_prefix`. Missing or malformed chart
/// files are logged and skipped; their marker and image stay in the document.
/// Marker comments are always kept. The document is only modified when the
/// whole pass succeeds.
pub fn replace_placeholders(
    document: &mut HtmlDocument,
    path_prefix: &Path,
    settings: &PlaceholderSettings,
) -> Result<ReplaceSummary, EmbedError> {
    let html = document.as_str();
    let placeholders = find_placeholders(html, &settings.sentinel)?;
    log::debug!("Found {} placeholder(s)", placeholders.len());

    let mut summary = ReplaceSummary::default();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut scripts = String::new();

    for placeholder in &placeholders {
        let path = path_prefix.join(&placeholder.chart_path);

        if !path.is_file() {
            log::warn!(
                "Could not find {}. Continuing without replacement",
                path.display()
            );
            summary.missing += 1;
            continue;
        }

        match extract_chart_markup(&path, &settings.container_class) {
            Ok(markup) => {
                log::debug!(
                    "Replacing {} with the chart from {}",
                    placeholder.image_tag,
                    path.display()
                );
                edits.push((placeholder.image.clone(), markup.container));
                scripts.push_str(&markup.script);
                scripts.push('\n');
                summary.replaced += 1;
            }
            Err(EmbedError::MalformedExport { path, reason }) => {
                log::warn!(
                    "Skipping {}: {reason}. Continuing without replacement",
                    path.display()
                );
                summary.malformed += 1;
            }
            Err(other) => return Err(other),
        }
    }

    if edits.is_empty() {
        return Ok(summary);
    }

    let body_close = document.body_close_position()?;
    edits.push((body_close..body_close, scripts));
    edits.sort_by_key(|(span, _)| span.start);

    let output = apply_edits(document.as_str(), &edits);
    document.replace_content(output);

    Ok(summary)
}

/// Rebuilds `source` with each span replaced by its text. Spans are sorted and
/// do not overlap; a span starting inside an earlier one is clamped.
fn apply_edits(source: &str, edits: &[(Range<usize>, String)]) -> String {
    let added: usize = edits.iter().map(|(_, text)| text.len()).sum();
    let mut output = String::with_capacity(source.len() + added);
    let mut cursor = 0;

    for (span, text) in edits {
        let start = span.start.max(cursor);
        output.push_str(&source[cursor..start]);
        output.push_str(text);
        cursor = span.end.max(start);
    }

    output.push_str(&source[cursor..]);
    output
}
