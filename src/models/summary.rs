use std::collections::BTreeMap;

use crate::models::feature::FeatureStatus;

/// Parsed license report: one status per feature code plus any diagnostic
/// text that came with it.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub features: BTreeMap<String, FeatureStatus>,
    pub error: Option<String>,
}

impl Summary {
    /// Case-insensitive lookup; report codes are upper case.
    pub fn get(&self, code: &str) -> Option<&FeatureStatus> {
        self.features.get(&code.trim().to_uppercase())
    }

    /// Every known code, ascending.
    pub fn codes(&self) -> Vec<String> {
        self.features.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.error.is_none()
    }

    pub(crate) fn feature_mut(&mut self, code: &str) -> &mut FeatureStatus {
        self.features
            .entry(code.to_string())
            .or_insert_with(|| FeatureStatus::new(code))
    }
}
