mod results;
#[allow(clippy::module_inception)]
mod scanner;

pub use results::ScanResults;
pub use scanner::{CodebaseScanner, ScannerConfig, default_max_in_flight, extract_file};
