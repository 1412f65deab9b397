//! Access to the published charting library: its release listing and its
//! minified script body.
//!
//! [`PlotlySource`] is the seam between the document passes and the network.
//! [`HttpSource`] talks to the real endpoints through a blocking `ureq` agent.

use ureq::Agent;

use crate::config::RemoteSettings;
use crate::error::EmbedError;
use crate::release::Version;

/// Upper bound for a downloaded body. The minified library is a few MiB.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Provider of the library release listing and script bodies.
pub trait PlotlySource {
    /// Returns the text of the release listing page.
    fn release_page(&self) -> Result<String, EmbedError>;

    /// Returns the minified script body published for `version`.
    fn script(&self, version: &Version) -> Result<String, EmbedError>;
}

/// [`PlotlySource`] backed by HTTP requests to configurable endpoints.
pub struct HttpSource {
    agent: Agent,
    settings: RemoteSettings,
}

impl HttpSource {
    pub fn new(settings: &RemoteSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(settings.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            settings: settings.clone(),
        }
    }

    fn get_text(&self, url: &str) -> Result<String, EmbedError> {
        log::debug!("GET {url}");

        let response = self.agent.get(url).call().map_err(|e| EmbedError::Http {
            url: url.to_owned(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            return Err(EmbedError::Http {
                url: url.to_owned(),
                message: format!("HTTP {status}"),
            });
        }

        body.with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| EmbedError::Http {
                url: url.to_owned(),
                message: e.to_string(),
            })
    }
}

impl PlotlySource for HttpSource {
    fn release_page(&self) -> Result<String, EmbedError> {
        self.get_text(&self.settings.release_page_url)
    }

    fn script(&self, version: &Version) -> Result<String, EmbedError> {
        let url = self.settings.script_url(version.as_str());
        self.get_text(&url)
    }
}
