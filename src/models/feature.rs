use std::collections::{BTreeMap, HashMap};

use crate::models::usage::UsageEntry;

/// License status for one feature code, accumulated across every table
/// block that mentions it.
#[derive(Clone, Debug, Default)]
pub struct FeatureStatus {
    pub code: String,
    pub model: String,
    pub total: u64,
    pub in_use: u64,
    /// Remaining report columns, last write wins
    pub attributes: BTreeMap<String, String>,
    usage: Vec<UsageEntry>,
    usage_index: HashMap<String, usize>,
}

impl FeatureStatus {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Licenses not checked out. Not clamped: an inconsistent report
    /// can produce a negative value.
    /// Saturates at the `i64` bounds.
    pub fn available(&self) -> i64 {
        let diff = i128::from(self.total) - i128::from(self.in_use);
        i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
    }

    /// `(available, total)` pair for progress style displays.
    pub fn availability(&self) -> (i64, u64) {
        (self.available(), self.total)
    }

    /// Plural, lower-cased model name ("tokens", "credits").
    pub fn model_label(&self) -> String {
        let model = self.model.trim();
        if model.is_empty() {
            "licenses".to_string()
        } else {
            format!("{}s", model.to_lowercase())
        }
    }

    /// Add a usage line, merging into an earlier entry for the same job.
    /// A merged entry keeps the position where the job was first seen.
    pub fn record_usage(&mut self, entry: UsageEntry) {
        match self.usage_index.get(&entry.job_key) {
            Some(&idx) => self.usage[idx].merge(&entry),
            None => {
                self.usage_index
                    .insert(entry.job_key.clone(), self.usage.len());
                self.usage.push(entry);
            }
        }
    }

    pub fn usage_lines(&self) -> &[UsageEntry] {
        &self.usage
    }
}
