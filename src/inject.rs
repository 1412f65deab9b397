//! Injection of the charting library into the document head.

use std::fs;
use std::path::Path;

use crate::config::AssetSettings;
use crate::error::EmbedError;
use crate::release::{fetch_latest_version, Version};
use crate::source::PlotlySource;
use crate::HtmlDocument;

/// How the library script is made available to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// Inline the whole script body in a `<script>` element.
    Embed,
    /// Write the script next to the output and reference it with `<script src>`.
    Link,
}

/// Resolves the latest library version, downloads its script and adds it
/// right after the opening `<head>` tag.
///
/// In [`ScriptMode::Link`] the body is written verbatim to
/// `<output_dir>/<assets.dir>/<file name>`, creating the directory if needed.
///
/// A document without `<head>` is rejected before any request is made. Each
/// call adds one more head entry; injecting twice yields two scripts.
pub fn inject_script(
    document: &mut HtmlDocument,
    source: &dyn PlotlySource,
    output_dir: &Path,
    mode: ScriptMode,
    assets: &AssetSettings,
) -> Result<Version, EmbedError> {
    document.head_insertion_point()?;

    log::debug!("Fetching latest plotly version");
    let version = fetch_latest_version(source)?;
    let body = source.script(&version)?;

    let snippet = match mode {
        ScriptMode::Embed => {
            log::debug!("Embedding plotly.js {version}");
            format!("<script>{body}</script>")
        }
        ScriptMode::Link => {
            let asset_dir = output_dir.join(&assets.dir);
            fs::create_dir_all(&asset_dir).map_err(|e| EmbedError::io(&asset_dir, e))?;

            let asset_path = asset_dir.join(assets.file_name(version.as_str()));
            log::debug!("Saving plotly.js to {}", asset_path.display());
            fs::write(&asset_path, &body).map_err(|e| EmbedError::io(&asset_path, e))?;

            format!(
                "<script src=\"{}\"></script>",
                assets.link_target(version.as_str())
            )
        }
    };

    document.insert_after_head(&snippet)?;
    Ok(version)
}
