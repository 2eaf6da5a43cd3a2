pub mod comparator;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod pixel;
pub mod stats;
pub mod types;
pub mod writer;

pub use comparator::{Comparator, ComparisonResult, ResembleComparator};
pub use config::{ComparisonConfiguration, OutputPaths, OutputSettings, Tolerance};
pub use error::{DiffError, Result};
pub use pipeline::{run, run_default};
pub use stats::MismatchStatistics;
pub use types::{ComparisonRequest, ErrorColor, ErrorType, IgnoreFlag};
