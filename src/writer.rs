use std::fs;
use std::path::{Path, PathBuf};

use crate::comparator::ComparisonResult;
use crate::config::OutputPaths;
use crate::error::{DiffError, Result};

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn staging_path(path: &Path) -> PathBuf {
    sibling(path, ".partial")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".previous")
}

/// Write the diff PNG and the statistics JSON, replacing earlier outputs.
///
/// Both payloads are built in memory and staged next to their targets. The
/// previous image is set aside before it is replaced and put back if the
/// statistics cannot be moved into place, so a failed run leaves either both
/// new files or the old pair.
pub fn write_results(result: &ComparisonResult, paths: &OutputPaths) -> Result<()> {
    println!("{:#?}", result.statistics);

    let png = result.get_buffer()?;
    let json = result.statistics.to_json()?;

    let image_tmp = staging_path(&paths.image);
    let stats_tmp = staging_path(&paths.statistics);
    let staged = [image_tmp.as_path(), stats_tmp.as_path()];

    for (tmp, bytes) in [(&image_tmp, png.as_slice()), (&stats_tmp, json.as_bytes())] {
        if let Err(e) = fs::write(tmp, bytes) {
            discard(&staged);
            return Err(DiffError::file_access(tmp, e));
        }
    }

    let backup = backup_path(&paths.image);
    let had_previous = paths.image.exists();
    if had_previous {
        if let Err(e) = fs::rename(&paths.image, &backup) {
            discard(&staged);
            return Err(DiffError::file_access(&paths.image, e));
        }
    }

    let committed = fs::rename(&image_tmp, &paths.image)
        .map_err(|e| DiffError::file_access(&paths.image, e))
        .and_then(|()| {
            fs::rename(&stats_tmp, &paths.statistics)
                .map_err(|e| DiffError::file_access(&paths.statistics, e))
        });
    if let Err(e) = committed {
        restore(&paths.image, &backup, had_previous);
        discard(&staged);
        return Err(e);
    }

    if had_previous {
        if let Err(e) = fs::remove_file(&backup) {
            log::warn!("could not remove {}: {e}", backup.display());
        }
    }
    log::info!(
        "wrote {} and {}",
        paths.image.display(),
        paths.statistics.display()
    );
    Ok(())
}

/// Put the previous image back, or drop the new one if there was none.
fn restore(target: &Path, backup: &Path, had_previous: bool) {
    let outcome = if had_previous {
        fs::rename(backup, target)
    } else if target.exists() {
        fs::remove_file(target)
    } else {
        Ok(())
    };
    if let Err(e) = outcome {
        log::warn!("could not restore {}: {e}", target.display());
    }
}

fn discard(staged: &[&Path]) {
    for tmp in staged {
        if tmp.exists() {
            if let Err(e) = fs::remove_file(tmp) {
                log::warn!("could not remove {}: {e}", tmp.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DiffBounds, DimensionDifference, MismatchStatistics};
    use image::{Rgba, RgbaImage};

    fn result(pixel: [u8; 4], pct: f64) -> ComparisonResult {
        ComparisonResult {
            image: Some(RgbaImage::from_pixel(2, 2, Rgba(pixel))),
            statistics: MismatchStatistics {
                is_same_dimensions: true,
                dimension_difference: DimensionDifference::default(),
                raw_mis_match_percentage: pct,
                mis_match_percentage: format!("{pct:.2}"),
                diff_bounds: DiffBounds::empty(2, 2),
                analysis_time: 0,
            },
        }
    }

    #[test]
    fn test_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        write_results(&result([1, 2, 3, 255], 0.0), &paths).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.statistics).unwrap()).unwrap();
        assert_eq!(json["misMatchPercentage"], "0.00");
        let png = fs::read(&paths.image).unwrap();
        assert!(!png.is_empty());
        assert!(!staging_path(&paths.image).exists());
        assert!(!staging_path(&paths.statistics).exists());
        assert!(!backup_path(&paths.image).exists());
    }

    #[test]
    fn test_second_write_overwrites_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        write_results(&result([0, 0, 0, 255], 10.0), &paths).unwrap();
        write_results(&result([9, 9, 9, 255], 42.0), &paths).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.statistics).unwrap()).unwrap();
        assert_eq!(json["rawMisMatchPercentage"], 42.0);
        let img = image::open(&paths.image).unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_unwritable_directory_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths {
            image: dir.path().join("output.png"),
            statistics: dir.path().join("missing-dir").join("output.json"),
        };
        let err = write_results(&result([0, 0, 0, 255], 0.0), &paths).unwrap_err();
        assert!(matches!(err, DiffError::FileAccess { .. }), "{err}");
        assert!(!paths.image.exists());
        assert!(!staging_path(&paths.image).exists());
    }

    #[test]
    fn test_failed_statistics_rename_restores_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        fs::write(&paths.image, b"old image").unwrap();
        // a non-empty directory cannot be replaced by a file
        fs::create_dir(&paths.statistics).unwrap();
        fs::write(paths.statistics.join("keep"), b"x").unwrap();

        let err = write_results(&result([5, 5, 5, 255], 1.0), &paths).unwrap_err();
        assert!(matches!(err, DiffError::FileAccess { .. }), "{err}");
        assert_eq!(fs::read(&paths.image).unwrap(), b"old image");
        assert!(!backup_path(&paths.image).exists());
        assert!(!staging_path(&paths.image).exists());
        assert!(!staging_path(&paths.statistics).exists());
    }

    #[test]
    fn test_failed_statistics_rename_without_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        fs::create_dir(&paths.statistics).unwrap();
        fs::write(paths.statistics.join("keep"), b"x").unwrap();

        assert!(write_results(&result([5, 5, 5, 255], 1.0), &paths).is_err());
        assert!(!paths.image.exists());
    }

    #[test]
    fn test_missing_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::in_dir(dir.path());
        let mut r = result([0, 0, 0, 255], 0.0);
        r.image = None;
        assert!(write_results(&r, &paths).is_err());
        assert!(!paths.image.exists());
        assert!(!paths.statistics.exists());
    }

    #[test]
    fn test_staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("./output.png")),
            PathBuf::from("./output.png.partial")
        );
    }
}
