use serde::Serialize;

/// Reference minus candidate, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DimensionDifference {
    pub width: i64,
    pub height: i64,
}

/// Smallest box enclosing every mismatching pixel. Left inverted
/// (top = height, left = width) when nothing differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DiffBounds {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl DiffBounds {
    pub fn empty(width: u32, height: u32) -> Self {
        DiffBounds {
            top: height,
            left: width,
            bottom: 0,
            right: 0,
        }
    }

    pub fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.top = self.top.min(y);
        self.bottom = self.bottom.max(y);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchStatistics {
    pub is_same_dimensions: bool,
    pub dimension_difference: DimensionDifference,
    pub raw_mis_match_percentage: f64,
    /// `raw_mis_match_percentage` with two decimals.
    pub mis_match_percentage: String,
    pub diff_bounds: DiffBounds,
    /// Milliseconds spent in the pixel pass.
    pub analysis_time: u64,
}

impl MismatchStatistics {
    pub fn mismatch_percentage(mismatched: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        mismatched as f64 / total as f64 * 100.0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
