//! Process-wide layout grid settings.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed column counts.
pub const COLUMNS_RANGE: RangeInclusive<u32> = 6..=36;
/// Allowed row heights in pixels.
pub const ROW_HEIGHT_RANGE: RangeInclusive<f64> = 10.0..=40.0;
/// Allowed page margins in pixels.
pub const MARGIN_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Layout grid shared by every page.
///
/// Changing these never moves blocks: block coordinates are grid units, so
/// only their pixel mapping changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    pub columns: u32,
    pub row_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub gutter: f64,
    pub show_grid: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 24,
            row_height: 20.0,
            margin_top: 40.0,
            margin_right: 40.0,
            margin_bottom: 40.0,
            margin_left: 40.0,
            gutter: 0.0,
            show_grid: true,
        }
    }
}

impl GridSettings {
    /// Merge a partial update, saturating each field into its allowed range.
    pub fn apply(&mut self, update: &GridSettingsUpdate) {
        if let Some(columns) = update.columns {
            self.columns = columns.clamp(*COLUMNS_RANGE.start(), *COLUMNS_RANGE.end());
        }
        if let Some(row_height) = update.row_height {
            self.row_height = clamp_range(row_height, &ROW_HEIGHT_RANGE);
        }
        if let Some(margin) = update.margin_top {
            self.margin_top = clamp_range(margin, &MARGIN_RANGE);
        }
        if let Some(margin) = update.margin_right {
            self.margin_right = clamp_range(margin, &MARGIN_RANGE);
        }
        if let Some(margin) = update.margin_bottom {
            self.margin_bottom = clamp_range(margin, &MARGIN_RANGE);
        }
        if let Some(margin) = update.margin_left {
            self.margin_left = clamp_range(margin, &MARGIN_RANGE);
        }
        if let Some(gutter) = update.gutter {
            self.gutter = gutter.max(0.0);
        }
        if let Some(show_grid) = update.show_grid {
            self.show_grid = show_grid;
        }
    }

    /// Copy with every field saturated into its allowed range.
    pub fn normalized(&self) -> Self {
        let mut settings = Self::default();
        settings.apply(&GridSettingsUpdate {
            columns: Some(self.columns),
            row_height: Some(self.row_height),
            margin_top: Some(self.margin_top),
            margin_right: Some(self.margin_right),
            margin_bottom: Some(self.margin_bottom),
            margin_left: Some(self.margin_left),
            gutter: Some(self.gutter),
            show_grid: Some(self.show_grid),
        });
        settings
    }
}

fn clamp_range(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Partial grid settings update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettingsUpdate {
    pub columns: Option<u32>,
    pub row_height: Option<f64>,
    pub margin_top: Option<f64>,
    pub margin_right: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub gutter: Option<f64>,
    pub show_grid: Option<bool>,
}

impl GridSettingsUpdate {
    pub fn columns(columns: u32) -> Self {
        Self {
            columns: Some(columns),
            ..Self::default()
        }
    }

    pub fn row_height(row_height: f64) -> Self {
        Self {
            row_height: Some(row_height),
            ..Self::default()
        }
    }

    /// Same margin on all four sides.
    pub fn margins(margin: f64) -> Self {
        Self {
            margin_top: Some(margin),
            margin_right: Some(margin),
            margin_bottom: Some(margin),
            margin_left: Some(margin),
            ..Self::default()
        }
    }
}
