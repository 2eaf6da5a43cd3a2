use crate::comparator::{Comparator, ResembleComparator};
use crate::config::{ComparisonConfiguration, OutputPaths};
use crate::error::Result;
use crate::loader;
use crate::stats::MismatchStatistics;
use crate::types::ComparisonRequest;
use crate::writer;

/// Load both inputs, compare them and write the two outputs, in that order.
pub fn run<C: Comparator>(
    request: &ComparisonRequest,
    config: &ComparisonConfiguration,
    paths: &OutputPaths,
    comparator: &C,
) -> Result<MismatchStatistics> {
    log::info!(
        "comparing {} against {}",
        request.path_a.display(),
        request.path_b.display()
    );
    let (a, b) = loader::load_pair(request)?;

    let result = comparator.compare(&a, &b, config)?;
    log::info!(
        "mismatch {}% (same dimensions: {})",
        result.statistics.mis_match_percentage,
        result.statistics.is_same_dimensions
    );

    writer::write_results(&result, paths)?;
    Ok(result.statistics)
}

/// [`run`] with the stock comparator, the fixed configuration and
/// `./output.png` / `./output.json`.
pub fn run_default(request: &ComparisonRequest) -> Result<MismatchStatistics> {
    run(
        request,
        &ComparisonConfiguration::default(),
        &OutputPaths::default(),
        &ResembleComparator,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::ComparisonResult;
    use crate::error::DiffError;
    use crate::stats::{DiffBounds, DimensionDifference};
    use image::{Rgba, RgbaImage};
    use std::cell::{Cell, RefCell};
    use std::fs;

    /// Records the buffers it was handed and reports a fixed result.
    struct FakeComparator {
        calls: Cell<usize>,
        seen: RefCell<Vec<Vec<u8>>>,
    }

    impl FakeComparator {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                seen: Default::default(),
            }
        }
    }

    impl Comparator for FakeComparator {
        fn compare(
            &self,
            a: &[u8],
            b: &[u8],
            _config: &ComparisonConfiguration,
        ) -> Result<ComparisonResult> {
            self.calls.set(self.calls.get() + 1);
            self.seen.borrow_mut().extend([a.to_vec(), b.to_vec()]);
            Ok(ComparisonResult {
                image: Some(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))),
                statistics: MismatchStatistics {
                    is_same_dimensions: true,
                    dimension_difference: DimensionDifference::default(),
                    raw_mis_match_percentage: 3.0,
                    mis_match_percentage: "3.00".to_string(),
                    diff_bounds: DiffBounds::empty(1, 1),
                    analysis_time: 0,
                },
            })
        }
    }

    #[test]
    fn test_run_passes_inputs_in_order_and_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        let fake = FakeComparator::new();

        let stats = run(
            &ComparisonRequest::new(&a, &b),
            &ComparisonConfiguration::default(),
            &paths,
            &fake,
        )
        .unwrap();

        assert_eq!(stats.mis_match_percentage, "3.00");
        assert_eq!(fake.calls.get(), 1);
        assert_eq!(*fake.seen.borrow(), vec![b"first".to_vec(), b"second".to_vec()]);
        assert!(paths.image.exists());
        assert!(paths.statistics.exists());
    }

    #[test]
    fn test_missing_input_never_reaches_comparator() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, b"first").unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        let fake = FakeComparator::new();

        let err = run(
            &ComparisonRequest::new(&a, dir.path().join("gone.bin")),
            &ComparisonConfiguration::default(),
            &paths,
            &fake,
        )
        .unwrap_err();

        assert!(matches!(err, DiffError::FileAccess { .. }));
        assert_eq!(fake.calls.get(), 0);
        assert!(!paths.image.exists());
        assert!(!paths.statistics.exists());
    }
}
