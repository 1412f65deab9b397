//! Resolution of the latest published library version.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::EmbedError;
use crate::source::PlotlySource;

static RELEASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v(\d+\.\d+\.\d+)").expect("release tag pattern is valid"));

/// A `major.minor.patch` version string, without the leading `v` of the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fetches the release listing and returns the first version tag found on it.
///
/// Every call goes to the source again; nothing is cached between calls.
pub fn fetch_latest_version(source: &dyn PlotlySource) -> Result<Version, EmbedError> {
    let page = source.release_page()?;
    let version = parse_release_page(&page)?;
    log::debug!("Latest version is {version}");
    Ok(version)
}

/// Extracts the first `v<digits>.<digits>.<digits>` occurrence from `page`.
pub fn parse_release_page(page: &str) -> Result<Version, EmbedError> {
    RELEASE_TAG
        .captures(page)
        .map(|caps| Version(caps[1].to_owned()))
        .ok_or(EmbedError::VersionNotFound)
}
