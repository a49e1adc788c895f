pub mod diff;
pub mod highlight;
pub mod metrics;

pub use diff::CharClass;
pub use metrics::Metrics;
