//! Settings for asset locations, remote endpoints and placeholder markers.
//!
//! Values come from an optional `asp-embed.toml` found next to the input
//! document or in one of its parent directories. Every key has a default, so
//! a missing file (or a missing section) behaves like an empty one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::EmbedError;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "asp-embed.toml";

/// Placeholder in URL and file name templates that receives the resolved version.
pub const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub assets: AssetSettings,
    pub placeholders: PlaceholderSettings,
    pub output: OutputSettings,
}

/// Where the library version and script body are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSettings {
    /// Page listing the library releases; scraped for the first version tag.
    pub release_page_url: String,
    /// Script download URL, with `{version}` substituted.
    pub script_url_template: String,
    /// Global timeout for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            release_page_url: "https://github.com/plotly/plotly.js/releases".to_owned(),
            script_url_template: "https://cdn.plot.ly/plotly-{version}.min.js".to_owned(),
            timeout_secs: 120,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn script_url(&self, version: &str) -> String {
        self.script_url_template.replace(VERSION_PLACEHOLDER, version)
    }
}

/// Layout of the side-by-side asset written in link mode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSettings {
    /// Directory, relative to the output document, that receives the script.
    pub dir: String,
    pub file_template: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            dir: "dist".to_owned(),
            file_template: "plotly-{version}.min.js".to_owned(),
        }
    }
}

impl AssetSettings {
    pub fn file_name(&self, version: &str) -> String {
        self.file_template.replace(VERSION_PLACEHOLDER, version)
    }

    /// The `src` attribute value pointing at the asset, always with forward slashes.
    pub fn link_target(&self, version: &str) -> String {
        let dir = self.dir.trim_end_matches(['/', '\\']);
        format!("{dir}/{}", self.file_name(version))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderSettings {
    /// Text opening a marker comment, e.g. `asp:` in `<!-- asp: charts/a.html -->`.
    pub sentinel: String,
    /// Class carried by the chart container inside an export file.
    pub container_class: String,
}

impl Default for PlaceholderSettings {
    fn default() -> Self {
        Self {
            sentinel: "asp:".to_owned(),
            container_class: "plotly-graph-div".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Inserted between the input file stem and its extension.
    pub suffix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: "_embedded".to_owned(),
        }
    }
}

impl Settings {
    /// Loads settings for a document living in `start_dir`.
    ///
    /// Searches `start_dir` and its ancestors for [`CONFIG_FILENAME`]. Returns
    /// the defaults and `None` when no file is found.
    pub fn discover(start_dir: &Path) -> Result<(Self, Option<PathBuf>), EmbedError> {
        match find_config_file(start_dir) {
            Some(path) => {
                let settings = Self::load(&path)?;
                Ok((settings, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Loads and validates settings from a specific file.
    pub fn load(path: &Path) -> Result<Self, EmbedError> {
        let content = std::fs::read_to_string(path).map_err(|e| EmbedError::io(path, e))?;
        Self::from_toml_str(&content, path)
    }

    /// Parses settings from TOML text. `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, EmbedError> {
        let settings: Self = toml::from_str(content).map_err(|e| EmbedError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        settings.validate().map_err(|message| EmbedError::Config {
            path: origin.to_path_buf(),
            message,
        })?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), String> {
        require_http_url(&self.remote.release_page_url, "remote.release_page_url")?;
        require_http_url(&self.remote.script_url_template, "remote.script_url_template")?;
        require_version_placeholder(
            &self.remote.script_url_template,
            "remote.script_url_template",
        )?;
        require_version_placeholder(&self.assets.file_template, "assets.file_template")?;
        require_non_empty(&self.assets.dir, "assets.dir")?;
        require_non_empty(&self.placeholders.sentinel, "placeholders.sentinel")?;
        require_non_empty(&self.placeholders.container_class, "placeholders.container_class")?;
        require_non_empty(&self.output.suffix, "output.suffix")?;

        if self.remote.timeout_secs == 0 {
            return Err("remote.timeout_secs must be greater than 0".to_owned());
        }

        Ok(())
    }
}

fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

fn require_non_empty(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

fn require_version_placeholder(template: &str, field: &str) -> Result<(), String> {
    if !template.contains(VERSION_PLACEHOLDER) {
        return Err(format!("{field} must contain {VERSION_PLACEHOLDER}"));
    }
    Ok(())
}
