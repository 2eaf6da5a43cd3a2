use std::path::PathBuf;

use crate::error::{DiffError, Result};
use crate::types::{ErrorColor, ErrorType, IgnoreFlag};

/// How the diff image is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSettings {
    pub error_color: ErrorColor,
    pub error_type: ErrorType,
    /// Alpha multiplier for pixels that did not change, in [0, 1].
    pub transparency: f64,
    /// Side length above which antialiasing checks sample a sparse grid. 0 disables it.
    pub large_image_threshold: u32,
    pub output_diff: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            error_color: ErrorColor::rgb(255, 0, 255),
            error_type: ErrorType::Movement,
            transparency: 0.3,
            large_image_threshold: 1200,
            output_diff: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonConfiguration {
    pub output: OutputSettings,
    pub scale_to_same_size: bool,
    pub ignore: Vec<IgnoreFlag>,
}

impl Default for ComparisonConfiguration {
    fn default() -> Self {
        Self {
            output: OutputSettings::default(),
            scale_to_same_size: true,
            ignore: vec![
                IgnoreFlag::Nothing,
                IgnoreFlag::Less,
                IgnoreFlag::Antialiasing,
                IgnoreFlag::Colors,
                IgnoreFlag::Alpha,
            ],
        }
    }
}

impl ComparisonConfiguration {
    pub fn validate(&self) -> Result<()> {
        let t = self.output.transparency;
        if !(0.0..=1.0).contains(&t) {
            return Err(DiffError::InvalidConfig(format!(
                "transparency must be within [0, 1], got {t}"
            )));
        }
        Ok(())
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::from_ignore(&self.ignore)
    }
}

/// Per-channel thresholds plus the comparison modes the ignore set switches on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
    /// Brightness tolerance used when colors are compared by luminance only.
    pub min_brightness: f64,
    /// Brightness gap that makes two neighbours "contrasting".
    pub max_brightness: f64,
    pub ignore_antialiasing: bool,
    pub ignore_colors: bool,
}

impl Tolerance {
    /// Thresholds in effect before any ignore flag is applied.
    pub const DEFAULT: Tolerance = Tolerance {
        red: 16.0,
        green: 16.0,
        blue: 16.0,
        alpha: 16.0,
        min_brightness: 16.0,
        max_brightness: 240.0,
        ignore_antialiasing: false,
        ignore_colors: false,
    };

    pub const NOTHING: Tolerance = Tolerance {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
        min_brightness: 0.0,
        max_brightness: 255.0,
        ignore_antialiasing: false,
        ignore_colors: false,
    };

    /// Overwrite the fields `flag` controls. `Colors` leaves the RGB
    /// thresholds as they were.
    pub fn apply(&mut self, flag: IgnoreFlag) {
        match flag {
            IgnoreFlag::Nothing => *self = Tolerance::NOTHING,
            IgnoreFlag::Less => {
                self.set_channels(16.0, 16.0);
                self.set_brightness(16.0, 240.0);
                self.set_modes(false, false);
            }
            IgnoreFlag::Antialiasing => {
                self.set_channels(32.0, 32.0);
                self.set_brightness(64.0, 96.0);
                self.set_modes(true, false);
            }
            IgnoreFlag::Colors => {
                self.alpha = 16.0;
                self.set_brightness(16.0, 240.0);
                self.set_modes(false, true);
            }
            IgnoreFlag::Alpha => {
                self.set_channels(16.0, 255.0);
                self.set_brightness(16.0, 240.0);
                self.set_modes(false, false);
            }
        }
    }

    fn set_channels(&mut self, rgb: f64, alpha: f64) {
        self.red = rgb;
        self.green = rgb;
        self.blue = rgb;
        self.alpha = alpha;
    }

    fn set_brightness(&mut self, min: f64, max: f64) {
        self.min_brightness = min;
        self.max_brightness = max;
    }

    fn set_modes(&mut self, antialiasing: bool, colors: bool) {
        self.ignore_antialiasing = antialiasing;
        self.ignore_colors = colors;
    }

    /// A single flag applied to [`Tolerance::DEFAULT`].
    pub fn preset(flag: IgnoreFlag) -> Tolerance {
        Tolerance::from_ignore(&[flag])
    }

    /// Apply the flags in order, starting from [`Tolerance::DEFAULT`]. Later
    /// flags overwrite what earlier ones set, so order matters.
    pub fn from_ignore(flags: &[IgnoreFlag]) -> Tolerance {
        let mut tol = Tolerance::DEFAULT;
        for &flag in flags {
            tol.apply(flag);
        }
        tol
    }
}

/// Where the diff image and the statistics land.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaths {
    pub image: PathBuf,
    pub statistics: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            image: dir.join("output.png"),
            statistics: dir.join("output.json"),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            image: PathBuf::from("./output.png"),
            statistics: PathBuf::from("./output.json"),
        }
    }
}
