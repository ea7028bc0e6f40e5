/// Data model for one section scan.
///
/// Re-exports the validated scan parameters, the daily time window, and the
/// ordered result set.
pub mod result;
pub mod spec;
pub mod window;

pub use result::{ScanOutcome, ScanResult};
pub use spec::ScanSpec;
pub use window::Window;
