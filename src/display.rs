use anyhow::Result;
use serde::Serialize;
use serde_json::json;

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

// Provide a no-op color shim when "colors" feature is disabled
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn yellow(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bold(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn dimmed(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for &str {
        fn as_str(&self) -> &str {
            self
        }
    }
    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim;

use crate::models::{FeatureStatus, Summary};

/// Feature codes reported when the caller names none.
pub const DEFAULT_FEATURES: &[&str] = &[
    "QAT", "QPT", "QXT", "SRU", "SUN", "QAX", "QSI", "QPA", "QCA", "QGA",
];

/// Which feature codes to report, and in what order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureSelection {
    /// The built-in [`DEFAULT_FEATURES`] list
    Default,
    /// Every code in the summary, ascending
    All,
    /// Caller supplied codes, in the given order (case-insensitive)
    Codes(Vec<String>),
}

impl FeatureSelection {
    pub fn resolve(&self, summary: &Summary) -> Vec<String> {
        match self {
            FeatureSelection::Default => DEFAULT_FEATURES.iter().map(|c| c.to_string()).collect(),
            FeatureSelection::All => summary.codes(),
            FeatureSelection::Codes(codes) if codes.is_empty() => {
                FeatureSelection::Default.resolve(summary)
            }
            FeatureSelection::Codes(codes) => codes.iter().map(|c| c.to_uppercase()).collect(),
        }
    }

    /// Requested features present in the summary, in requested order.
    /// Unknown codes are skipped.
    pub fn features<'a>(&self, summary: &'a Summary) -> Vec<&'a FeatureStatus> {
        self.resolve(summary)
            .iter()
            .filter_map(|code| summary.get(code))
            .collect()
    }
}

enum Line {
    Error(String),
    Availability { text: String, exhausted: bool },
    Usage(String),
}

impl Line {
    fn plain(&self) -> String {
        match self {
            Line::Error(text) => text.clone(),
            Line::Availability { text, .. } => text.clone(),
            Line::Usage(text) => format!("\t{text}"),
        }
    }
}

pub fn availability_line(status: &FeatureStatus) -> String {
    format!(
        "{} {} available of {} {}",
        status.code,
        status.available(),
        status.total,
        status.model_label()
    )
}

fn build_lines(summary: &Summary, selection: &FeatureSelection) -> Vec<Line> {
    let mut lines = Vec::new();
    if let Some(error) = summary.error.as_deref() {
        lines.extend(error.trim_end().lines().map(|l| Line::Error(l.to_string())));
    }
    for status in selection.features(summary) {
        lines.push(Line::Availability {
            text: availability_line(status),
            exhausted: status.available() <= 0,
        });
        lines.extend(status.usage_lines().iter().map(|u| Line::Usage(u.display())));
    }
    lines
}

/// Render the summary as text lines: the error block first, then one
/// availability line per requested feature followed by its tab-indented
/// usage lines.
pub fn render(summary: &Summary, selection: &FeatureSelection) -> Vec<String> {
    build_lines(summary, selection)
        .iter()
        .map(Line::plain)
        .collect()
}

pub fn print_text_output(summary: &Summary, selection: &FeatureSelection) {
    for line in build_lines(summary, selection) {
        match line {
            Line::Error(text) => println!("{}", text.red()),
            Line::Availability { text, exhausted } => {
                if exhausted {
                    println!("{}", text.yellow());
                } else {
                    println!("{}", text.bold());
                }
            }
            Line::Usage(text) => println!("\t{}", text.dimmed()),
        }
    }
}

#[derive(Serialize)]
struct UsageJson {
    job: String,
    licenses: u64,
    text: String,
}

#[derive(Serialize)]
struct FeatureJson<'a> {
    code: &'a str,
    model: &'a str,
    total: u64,
    in_use: u64,
    available: i64,
    usage: Vec<UsageJson>,
}

impl<'a> From<&'a FeatureStatus> for FeatureJson<'a> {
    fn from(status: &'a FeatureStatus) -> Self {
        FeatureJson {
            code: &status.code,
            model: &status.model,
            total: status.total,
            in_use: status.in_use,
            available: status.available(),
            usage: status
                .usage_lines()
                .iter()
                .map(|u| UsageJson {
                    job: u.job_key.clone(),
                    licenses: u.license_count,
                    text: u.display(),
                })
                .collect(),
        }
    }
}

/// Machine readable form of the same selection `render` would print.
pub fn build_json_output(summary: &Summary, selection: &FeatureSelection) -> serde_json::Value {
    let features: Vec<FeatureJson> = selection
        .features(summary)
        .into_iter()
        .map(FeatureJson::from)
        .collect();
    json!({
        "error": summary.error,
        "features": features,
    })
}

pub fn print_json_output(summary: &Summary, selection: &FeatureSelection) -> Result<()> {
    let value = build_json_output(summary, selection);
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
