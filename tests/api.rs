use std::cell::RefCell;
use std::path::Path;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use asp_embed::config::{AssetSettings, PlaceholderSettings, Settings};
use asp_embed::error::EmbedError;
use asp_embed::inject::{inject_script, ScriptMode};
use asp_embed::pipeline::process;
use asp_embed::release::{fetch_latest_version, Version};
use asp_embed::replace::replace_placeholders;
use asp_embed::source::PlotlySource;
use asp_embed::HtmlDocument;

const PRESENTATION: &str = include_str!("fixtures/presentation.html");
const SCATTER: &str = include_str!("fixtures/scatter.html");

/// Serves a fixed release page and records every requested script version.
struct StaticSource {
    page: &'static str,
    requested: RefCell<Vec<String>>,
}

impl StaticSource {
    fn new(page: &'static str) -> Self {
        Self {
            page,
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl PlotlySource for StaticSource {
    fn release_page(&self) -> Result<String, EmbedError> {
        Ok(self.page.to_owned())
    }

    fn script(&self, version: &Version) -> Result<String, EmbedError> {
        self.requested.borrow_mut().push(version.to_string());
        Ok(format!("/* plotly.js v{version} */"))
    }
}

struct UnreachableSource;

impl PlotlySource for UnreachableSource {
    fn release_page(&self) -> Result<String, EmbedError> {
        Err(EmbedError::Http {
            url: "https://github.com/plotly/plotly.js/releases".to_owned(),
            message: "connection refused".to_owned(),
        })
    }

    fn script(&self, _version: &Version) -> Result<String, EmbedError> {
        unreachable!("no version can be resolved")
    }
}

#[test]
fn latest_version_comes_from_first_tag_on_page() {
    let source = StaticSource::new(
        "<h2>Release v2.32.0-rc.1</h2><a href=\"/releases/tag/v2.31.1\">v2.31.1</a>",
    );

    let version = fetch_latest_version(&source).unwrap();

    assert_eq!(version.as_str(), "2.32.0");
}

#[test]
fn embedded_script_uses_resolved_version() {
    let source = StaticSource::new("tag v2.31.1");
    let mut document = HtmlDocument::new("<html><head><title>t</title></head></html>");

    inject_script(
        &mut document,
        &source,
        Path::new("."),
        ScriptMode::Embed,
        &AssetSettings::default(),
    )
    .unwrap();

    assert_eq!(
        document.as_str(),
        "<html><head>\n<script>/* plotly.js v2.31.1 */</script><title>t</title></head></html>"
    );
    assert_eq!(*source.requested.borrow(), vec!["2.31.1".to_owned()]);
}

#[test]
fn placeholder_pass_uses_fixture_export() {
    let temp = TempDir::new().unwrap();
    temp.child("charts/scatter.html").write_str(SCATTER).unwrap();
    let mut document = HtmlDocument::new(PRESENTATION);

    let summary =
        replace_placeholders(&mut document, temp.path(), &PlaceholderSettings::default()).unwrap();

    assert_eq!(summary.replaced, 1);
    assert_eq!(summary.missing, 1);
    let html = document.as_str();
    assert!(!html.contains("scatter.png"));
    assert!(html.contains("<!-- asp: charts/scatter.html -->"));
    assert!(html.contains("class=\"plotly-graph-div\""));
    assert!(html.contains("<img src=\"images/bars.png\""));
    assert!(html.contains("<img src=\"images/logo.png\""));

    let script_at = html.find("Plotly.newPlot(").unwrap();
    let body_close_at = html.rfind("</body>").unwrap();
    assert!(script_at < body_close_at);
    assert!(script_at > html.find("</section>").unwrap());
}

#[test]
fn process_writes_output_and_asset_next_to_input() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("export/index.html");
    input.write_str(PRESENTATION).unwrap();
    temp.child("charts/scatter.html").write_str(SCATTER).unwrap();
    let source = StaticSource::new("v2.31.1");

    let outcome = process(input.path(), temp.path(), &Settings::default(), &source).unwrap();

    assert_eq!(outcome.output_path, temp.child("export/index_embedded.html").path());
    assert_eq!(outcome.version.as_str(), "2.31.1");
    temp.child("export/dist/plotly-2.31.1.min.js")
        .assert("/* plotly.js v2.31.1 */");
    input.assert(PRESENTATION);

    let written = std::fs::read_to_string(&outcome.output_path).unwrap();
    assert!(written.contains("<script src=\"dist/plotly-2.31.1.min.js\"></script>"));
    // Entities are decoded after the passes.
    assert!(written.contains("<title>Quarterly Review & Outlook</title>"));
}

#[test]
fn unreachable_release_page_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("index.html");
    input.write_str(PRESENTATION).unwrap();

    let err = process(
        input.path(),
        temp.path(),
        &Settings::default(),
        &UnreachableSource,
    )
    .unwrap_err();

    assert!(matches!(err, EmbedError::Http { .. }));
    temp.child("index_embedded.html")
        .assert(predicates::path::missing());
    temp.child("dist").assert(predicates::path::missing());
}
