pub mod feature;
pub mod summary;
pub mod usage;

pub use feature::FeatureStatus;
pub use summary::Summary;
pub use usage::UsageEntry;
