use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{DiffError, Result};

/// The two images of one invocation, reference first.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
}

impl ComparisonRequest {
    pub fn new(path_a: impl Into<PathBuf>, path_b: impl Into<PathBuf>) -> Self {
        Self {
            path_a: path_a.into(),
            path_b: path_b.into(),
        }
    }

    /// Build a request from process arguments. The first item is the program name.
    /// Extra trailing arguments are ignored. Paths need not be valid UTF-8.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().skip(1).map(Into::<OsString>::into);
        let path_a = args.next().ok_or(DiffError::MissingArgument {
            position: 1,
            name: "pathA",
        })?;
        let path_b = args.next().ok_or(DiffError::MissingArgument {
            position: 2,
            name: "pathB",
        })?;
        Ok(Self::new(path_a, path_b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ErrorColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ErrorColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 255 }
    }
}

impl Default for ErrorColor {
    fn default() -> Self {
        Self::rgb(255, 0, 255)
    }
}

/// How a mismatching pixel is drawn into the diff image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorType {
    /// Solid error color.
    #[default]
    Flat,
    /// Candidate pixel tinted toward the error color.
    Movement,
    /// Solid error color, alpha scaled by the color distance.
    FlatDifferenceIntensity,
    /// Tint weighted by the color distance.
    MovementDifferenceIntensity,
    /// Only mismatching pixels are drawn, as they appear in the candidate.
    DiffOnly,
}

/// One class of pixel difference the comparison should tolerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IgnoreFlag {
    Nothing,
    Less,
    Antialiasing,
    Colors,
    Alpha,
}
