//! Defines the command-line interface for the application.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "asp-embed",
    version,
    about = "Embed exported Plotly charts into a static slide export."
)]
pub struct Cli {
    /// The exported presentation (e.g. index.html). The result is written next to it.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory against which the chart paths in `<!-- asp: ... -->` markers are resolved.
    #[arg(value_name = "PATH_PREFIX", default_value = ".")]
    pub path_prefix: PathBuf,
}
