//! Image comparison.
//!
//! The pipeline only depends on [`Comparator`]. [`ResembleComparator`] is the
//! stock implementation: it decodes both buffers, optionally rescales the
//! candidate to the reference size and walks every pixel, filtering
//! differences through the [`Tolerance`] derived from the ignore set.

use std::time::Instant;

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::config::{ComparisonConfiguration, Tolerance};
use crate::error::{DiffError, Result};
use crate::pixel::{self, Pixel};
use crate::stats::{DiffBounds, DimensionDifference, MismatchStatistics};

/// Side length of the sampling grid used on large images when antialiasing is ignored.
const LARGE_IMAGE_SKIP: u32 = 6;

#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// `None` when the configuration turned diff output off.
    pub image: Option<RgbaImage>,
    pub statistics: MismatchStatistics,
}

impl ComparisonResult {
    /// PNG-encode the diff image.
    pub fn get_buffer(&self) -> Result<Vec<u8>> {
        let image = self.image.as_ref().ok_or_else(|| {
            DiffError::Comparison("no diff image was rendered (output_diff is off)".to_string())
        })?;
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
            .map_err(DiffError::Encode)?;
        Ok(bytes)
    }
}

pub trait Comparator {
    /// Compare two encoded images. `a` is the reference, `b` the candidate.
    fn compare(
        &self,
        a: &[u8],
        b: &[u8],
        config: &ComparisonConfiguration,
    ) -> Result<ComparisonResult>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResembleComparator;

impl Comparator for ResembleComparator {
    fn compare(
        &self,
        a: &[u8],
        b: &[u8],
        config: &ComparisonConfiguration,
    ) -> Result<ComparisonResult> {
        config.validate()?;
        let img_a = decode(a, "pathA")?;
        let mut img_b = decode(b, "pathB")?;

        if config.scale_to_same_size && img_a.dimensions() != img_b.dimensions() {
            log::debug!(
                "scaling candidate {:?} to reference {:?}",
                img_b.dimensions(),
                img_a.dimensions()
            );
            img_b = imageops::resize(&img_b, img_a.width(), img_a.height(), FilterType::Triangle);
        }

        Ok(analyse(&img_a, &img_b, config))
    }
}

fn decode(bytes: &[u8], which: &'static str) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|source| DiffError::Decode { which, source })?;
    Ok(img.to_rgba8())
}

/// Pad `img` with transparent pixels up to `width` x `height`.
fn normalise(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, img, 0, 0);
    canvas
}

enum PixelMatch {
    Similar,
    SimilarBrightness,
    Mismatch,
}

fn classify(
    (a, p1): (&RgbaImage, &Pixel),
    (b, p2): (&RgbaImage, &Pixel),
    x: u32,
    y: u32,
    tol: &Tolerance,
) -> PixelMatch {
    if tol.ignore_colors {
        return if pixel::is_brightness_similar(p1, p2, tol) {
            PixelMatch::SimilarBrightness
        } else {
            PixelMatch::Mismatch
        };
    }

    if pixel::is_rgb_similar(p1, p2, tol) {
        return PixelMatch::Similar;
    }

    if tol.ignore_antialiasing
        && (pixel::is_antialiased(a, x, y, tol) || pixel::is_antialiased(b, x, y, tol))
        && pixel::is_brightness_similar(p1, p2, tol)
    {
        return PixelMatch::SimilarBrightness;
    }

    PixelMatch::Mismatch
}

fn analyse(img_a: &RgbaImage, img_b: &RgbaImage, config: &ComparisonConfiguration) -> ComparisonResult {
    let started = Instant::now();
    let tol = config.tolerance();
    let out = &config.output;

    let width = img_a.width().max(img_b.width());
    let height = img_a.height().max(img_b.height());
    let a = normalise(img_a, width, height);
    let b = normalise(img_b, width, height);

    let threshold = out.large_image_threshold;
    let skip = tol.ignore_antialiasing
        && threshold > 0
        && (width > threshold || height > threshold);

    let mut target = out.output_diff.then(|| RgbaImage::new(width, height));
    let mut bounds = DiffBounds::empty(width, height);
    let mut mismatched: u64 = 0;

    for y in 0..height {
        for x in 0..width {
            if skip && (x % LARGE_IMAGE_SKIP == 0 || y % LARGE_IMAGE_SKIP == 0) {
                continue;
            }

            let p1 = Pixel::at(&a, x, y);
            let p2 = Pixel::at(&b, x, y);
            let rendered = match classify((&a, &p1), (&b, &p2), x, y, &tol) {
                PixelMatch::Similar => pixel::copy_pixel(out.error_type, &p1, out.transparency),
                PixelMatch::SimilarBrightness => {
                    pixel::copy_grayscale_pixel(out.error_type, &p2, out.transparency)
                }
                PixelMatch::Mismatch => {
                    mismatched += 1;
                    bounds.include(x, y);
                    Some(pixel::error_pixel(out.error_type, out.error_color, &p1, &p2))
                }
            };

            if let (Some(target), Some(px)) = (target.as_mut(), rendered) {
                target.put_pixel(x, y, px);
            }
        }
    }

    let raw = MismatchStatistics::mismatch_percentage(mismatched, width as u64 * height as u64);
    let statistics = MismatchStatistics {
        is_same_dimensions: img_a.dimensions() == img_b.dimensions(),
        dimension_difference: DimensionDifference {
            width: img_a.width() as i64 - img_b.width() as i64,
            height: img_a.height() as i64 - img_b.height() as i64,
        },
        raw_mis_match_percentage: raw,
        mis_match_percentage: format!("{raw:.2}"),
        diff_bounds: bounds,
        analysis_time: started.elapsed().as_millis() as u64,
    };
    log::debug!("{mismatched} of {} pixels differ", width as u64 * height as u64);

    ComparisonResult {
        image: target,
        statistics,
    }
}
