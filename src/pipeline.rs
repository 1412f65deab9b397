//! The end-to-end processing of one slide export.

use std::ffi::OsString;
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder as TempFileBuilder;

use crate::config::Settings;
use crate::error::EmbedError;
use crate::inject::{inject_script, ScriptMode};
use crate::release::Version;
use crate::replace::{replace_placeholders, ReplaceSummary};
use crate::source::PlotlySource;
use crate::HtmlDocument;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub output_path: PathBuf,
    pub version: Version,
    pub summary: ReplaceSummary,
}

/// Processes the slide export at `input_path`.
///
/// Steps: load, link the library from an asset directory next to the input,
/// replace placeholders (chart paths resolved against `path_prefix`), decode
/// HTML entities, write `<stem><suffix>.<ext>` next to the input.
///
/// The input file is never modified. Nothing is written at the output path
/// unless every step succeeds.
pub fn process(
    input_path: &Path,
    path_prefix: &Path,
    settings: &Settings,
    source: &dyn PlotlySource,
) -> Result<ProcessOutcome, EmbedError> {
    let output_dir = parent_dir(input_path);

    log::debug!("Loading {}", input_path.display());
    let mut document = HtmlDocument::load(input_path)?;

    log::debug!("Adding plotly.js");
    let version = inject_script(
        &mut document,
        source,
        output_dir,
        ScriptMode::Link,
        &settings.assets,
    )?;

    log::debug!("Replacing images");
    let summary = replace_placeholders(&mut document, path_prefix, &settings.placeholders)?;

    log::debug!("Unescaping");
    document.unescape_entities();

    let output_path = embedded_output_path(input_path, &settings.output.suffix);
    log::debug!("Writing {}", output_path.display());
    let permissions = fs::metadata(input_path)
        .map_err(|e| EmbedError::io(input_path, e))?
        .permissions();
    write_atomically(&output_path, document.as_str(), permissions)?;

    Ok(ProcessOutcome {
        output_path,
        version,
        summary,
    })
}

/// Inserts `suffix` between the file stem and the extension of `input_path`.
///
/// `slides/index.html` becomes `slides/index_embedded.html`; a file without an
/// extension simply gets the suffix appended.
pub fn embedded_output_path(input_path: &Path, suffix: &str) -> PathBuf {
    let mut file_name = OsString::new();
    if let Some(stem) = input_path.file_stem() {
        file_name.push(stem);
    }
    file_name.push(suffix);
    if let Some(extension) = input_path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }

    input_path.with_file_name(file_name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes `content` through a temporary file in the destination directory and
/// renames it into place with the given permissions.
fn write_atomically(
    path: &Path,
    content: &str,
    permissions: Permissions,
) -> Result<(), EmbedError> {
    let dir = parent_dir(path);

    let mut temp_file = TempFileBuilder::new()
        .prefix(".asp-embed-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| EmbedError::io(dir, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| EmbedError::io(temp_file.path(), e))?;
    fs::set_permissions(temp_file.path(), permissions)
        .map_err(|e| EmbedError::io(temp_file.path(), e))?;

    temp_file
        .persist(path)
        .map_err(|e| EmbedError::io(path, e.error))?;

    Ok(())
}
