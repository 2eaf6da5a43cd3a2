use image::{Rgba, RgbaImage};

use crate::config::Tolerance;
use crate::types::{ErrorColor, ErrorType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba<u8>> for Pixel {
    fn from(p: Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Pixel { r, g, b, a }
    }
}

impl Pixel {
    pub fn at(image: &RgbaImage, x: u32, y: u32) -> Pixel {
        (*image.get_pixel(x, y)).into()
    }

    pub fn brightness(&self) -> f64 {
        0.3 * self.r as f64 + 0.59 * self.g as f64 + 0.11 * self.b as f64
    }

    /// Hue scaled to [0, 1).
    pub fn hue(&self) -> f64 {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == min {
            return 0.0;
        }
        let d = max - min;
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h / 6.0
    }
}

pub fn is_color_similar(a: f64, b: f64, tolerance: f64) -> bool {
    a == b || (a - b).abs() < tolerance
}

pub fn is_rgb_same(p1: &Pixel, p2: &Pixel) -> bool {
    p1.r == p2.r && p1.g == p2.g && p1.b == p2.b
}

pub fn is_rgb_similar(p1: &Pixel, p2: &Pixel, tol: &Tolerance) -> bool {
    is_color_similar(p1.r as f64, p2.r as f64, tol.red)
        && is_color_similar(p1.g as f64, p2.g as f64, tol.green)
        && is_color_similar(p1.b as f64, p2.b as f64, tol.blue)
        && is_color_similar(p1.a as f64, p2.a as f64, tol.alpha)
}

pub fn is_brightness_similar(p1: &Pixel, p2: &Pixel, tol: &Tolerance) -> bool {
    is_color_similar(p1.a as f64, p2.a as f64, tol.alpha)
        && is_color_similar(p1.brightness(), p2.brightness(), tol.min_brightness)
}

pub fn is_contrasting(p1: &Pixel, p2: &Pixel, tol: &Tolerance) -> bool {
    (p1.brightness() - p2.brightness()).abs() > tol.max_brightness
}

/// Whether the pixel at (x, y) looks like an antialiasing edge in `image`.
pub fn is_antialiased(image: &RgbaImage, x: u32, y: u32, tol: &Tolerance) -> bool {
    let source = Pixel::at(image, x, y);
    let source_hue = source.hue();
    let (width, height) = image.dimensions();

    let mut high_contrast = 0;
    let mut different_hue = 0;
    let mut equivalent = 0;

    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let sibling = Pixel::at(image, nx as u32, ny as u32);

            if is_contrasting(&source, &sibling, tol) {
                high_contrast += 1;
            }
            if is_rgb_same(&source, &sibling) {
                equivalent += 1;
            }
            if (sibling.hue() - source_hue).abs() > 0.3 {
                different_hue += 1;
            }
            if different_hue > 1 || high_contrast > 1 {
                return true;
            }
        }
    }

    equivalent < 2
}

/// Mean absolute RGB difference.
pub fn colors_distance(p1: &Pixel, p2: &Pixel) -> f64 {
    let dr = (p1.r as f64 - p2.r as f64).abs();
    let dg = (p1.g as f64 - p2.g as f64).abs();
    let db = (p1.b as f64 - p2.b as f64).abs();
    (dr + dg + db) / 3.0
}

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Render a mismatching pixel. `p1` is the reference, `p2` the candidate.
pub fn error_pixel(
    error_type: ErrorType,
    color: ErrorColor,
    p1: &Pixel,
    p2: &Pixel,
) -> Rgba<u8> {
    let er = color.red as f64;
    let eg = color.green as f64;
    let eb = color.blue as f64;
    match error_type {
        ErrorType::Flat => Rgba([color.red, color.green, color.blue, color.alpha]),
        ErrorType::Movement => Rgba([
            clamp_u8((p2.r as f64 * (er / 255.0) + er) / 2.0),
            clamp_u8((p2.g as f64 * (eg / 255.0) + eg) / 2.0),
            clamp_u8((p2.b as f64 * (eb / 255.0) + eb) / 2.0),
            p2.a,
        ]),
        ErrorType::FlatDifferenceIntensity => Rgba([
            color.red,
            color.green,
            color.blue,
            clamp_u8(colors_distance(p1, p2)),
        ]),
        ErrorType::MovementDifferenceIntensity => {
            let ratio = colors_distance(p1, p2) / 255.0 * 0.8;
            let tint = |c: u8, e: f64| clamp_u8((1.0 - ratio) * (c as f64 * (e / 255.0)) + ratio * e);
            Rgba([tint(p2.r, er), tint(p2.g, eg), tint(p2.b, eb), p2.a])
        }
        ErrorType::DiffOnly => Rgba([p2.r, p2.g, p2.b, p2.a]),
    }
}

/// Unchanged pixel as-is with faded alpha. `None` when only diffs are drawn.
pub fn copy_pixel(error_type: ErrorType, p: &Pixel, transparency: f64) -> Option<Rgba<u8>> {
    if error_type == ErrorType::DiffOnly {
        return None;
    }
    Some(Rgba([p.r, p.g, p.b, clamp_u8(p.a as f64 * transparency)]))
}

/// Like [`copy_pixel`] but flattened to its brightness.
pub fn copy_grayscale_pixel(
    error_type: ErrorType,
    p: &Pixel,
    transparency: f64,
) -> Option<Rgba<u8>> {
    if error_type == ErrorType::DiffOnly {
        return None;
    }
    let l = clamp_u8(p.brightness());
    Some(Rgba([l, l, l, clamp_u8(p.a as f64 * transparency)]))
}
