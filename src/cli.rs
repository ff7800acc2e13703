use std::path::PathBuf;

use crate::display::FeatureSelection;

#[derive(clap::Parser, Debug)]
#[command(
    name = "license-level",
    about = "Summarize license availability and usage from a dslsstat -usage report",
    after_help = "Pipe the report in, e.g.\n  abaqus licensing dslsstat -usage | license-level QAX SRU"
)]
pub struct Args {
    /// Feature codes to report, case-insensitive (default: common Abaqus features)
    #[arg(value_name = "FEATURE")]
    pub features: Vec<String>,

    /// Report every feature in the license table, sorted by code
    #[arg(long, alias = "v5")]
    pub all: bool,

    /// Read the report from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// File holding diagnostic output of the query tool, shown before the summary
    #[arg(long, value_name = "FILE")]
    pub errors: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Features reported when none are named, comma-separated
    #[arg(long, env = "LICENSE_LEVEL_FEATURES", value_delimiter = ',')]
    pub default_features: Vec<String>,

    /// Debug mode: log each recognized report line to stderr
    #[arg(long, env = "LICENSE_LEVEL_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    /// `--all` wins over named features; named features win over the
    /// configured default list.
    pub fn selection(&self) -> FeatureSelection {
        if self.all {
            return FeatureSelection::All;
        }
        let named = non_empty(&self.features);
        if !named.is_empty() {
            return FeatureSelection::Codes(named);
        }
        let defaults = non_empty(&self.default_features);
        if !defaults.is_empty() {
            return FeatureSelection::Codes(defaults);
        }
        FeatureSelection::Default
    }
}

fn non_empty(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
