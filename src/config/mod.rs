//! Run configuration: targets, exclusions, policy, and report settings

mod loader;

pub use loader::{wildcard_match, Config, ReportConfig};
