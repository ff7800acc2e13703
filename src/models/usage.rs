use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Everything up to and including the last " using" on the line.
static JOB_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+ using").unwrap());
static LICENSE_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) licenses").unwrap());
/// First parenthetical carrying the job identity, e.g. " (user, host)".
/// An unclosed group runs to end of line.
static IDENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*?, [^()]*\)?").unwrap());

/// One job holding licenses against a feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageEntry {
    pub job_key: String,
    pub license_count: u64,
    /// Raw line minus the identity parenthetical. The count inside is the
    /// one first reported; `display()` rewrites it.
    pub display_text: String,
}

impl UsageEntry {
    /// Build an entry from a raw usage line. Never fails: missing pieces
    /// degrade to an empty key or a zero count.
    pub fn from_line(line: &str) -> Self {
        let line = line.trim();
        let job_key = JOB_KEY_RE
            .find(line)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let license_count = LICENSE_COUNT_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0);
        let display_text = IDENTITY_RE.replace(line, "").trim().to_string();
        Self {
            job_key,
            license_count,
            display_text,
        }
    }

    /// Fold another line for the same job into this one.
    pub fn merge(&mut self, other: &UsageEntry) {
        self.license_count = self.license_count.saturating_add(other.license_count);
    }

    /// Display text with the current (possibly merged) license count.
    pub fn display(&self) -> String {
        let replacement = format!("{} licenses", self.license_count);
        LICENSE_COUNT_RE
            .replacen(&self.display_text, 1, NoExpand(&replacement))
            .into_owned()
    }
}
