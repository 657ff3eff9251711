//! Layout configuration for a label sheet.
//!
//! Every tunable that positions something on the page lives here, in one
//! immutable [`LayoutConfig`] that is handed to the layout functions. The
//! defaults describe an Avery L7651 sheet (38.1 x 21.2 mm, 5 x 13 on A4).
//! A JSON file may override any subset of fields.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 1 point = 1/72 in
pub const PT_TO_MM: f32 = 0.352_777_78;

/// Physical sheet geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSpec {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub label_width_mm: f32,
    pub label_height_mm: f32,
    pub columns: u32,
    pub rows: u32,
    /// Multiplier applied to the equal-spacing gutter between columns
    pub gutter_scale: f32,
    /// Shifts the whole block of rows up the page (negative moves it down)
    pub vertical_offset_mm: f32,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            label_width_mm: 38.1,
            label_height_mm: 21.2,
            columns: 5,
            rows: 13,
            gutter_scale: 0.95,
            vertical_offset_mm: 5.0,
        }
    }
}

impl SheetSpec {
    pub fn total_slots(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Positions and sizes of everything inside one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub padding_left_mm: f32,
    pub padding_right_mm: f32,
    pub qr_size_mm: f32,
    /// Quiet-zone width around the QR symbol, in modules
    pub qr_quiet_zone: u32,
    pub gap_mm: f32,
    pub gap_reduction_mm: f32,
    pub logo_max_width_mm: f32,
    pub logo_max_height_mm: f32,
    /// Lowers the logo/text column relative to the QR top edge
    pub right_section_top_offset_mm: f32,
    /// Space between the logo (or QR top) and the first text line
    pub text_gap_mm: f32,
    pub email_pt: f32,
    pub phone_pt: f32,
    pub id_pt: f32,
    pub phone_line_spacing: f32,
    pub id_line_spacing: f32,
    pub font_scale: f32,
    /// Horizontal condensing factor for text; point size is unchanged
    pub text_hscale: f32,
    /// Alignment of the text lines within the logo/text column
    pub text_align: TextAlign,
    /// Applied to every label (negative = left)
    pub x_nudge_mm: f32,
    /// Per-column shift as a fraction of label width; missing entries are 0
    pub column_shifts: Vec<f32>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            padding_left_mm: 1.0,
            padding_right_mm: 1.0,
            qr_size_mm: 19.0,
            qr_quiet_zone: 4,
            gap_mm: 0.0,
            gap_reduction_mm: 0.6,
            logo_max_width_mm: 19.0,
            logo_max_height_mm: 12.0,
            right_section_top_offset_mm: 1.5,
            text_gap_mm: PT_TO_MM,
            email_pt: 4.0,
            phone_pt: 4.0,
            id_pt: 7.0,
            phone_line_spacing: 1.2,
            id_line_spacing: 1.6,
            font_scale: 1.1,
            text_hscale: 0.92,
            text_align: TextAlign::Center,
            x_nudge_mm: -1.0,
            column_shifts: vec![0.06, 0.04, 0.02, 0.0, 0.0],
        }
    }
}

impl LabelStyle {
    pub fn column_shift(&self, col: usize) -> f32 {
        self.column_shifts.get(col).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
}

/// Bold standard-14 font used for all label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub sheet: SheetSpec,
    pub label: LabelStyle,
    pub font: FontFamily,
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let config: LayoutConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::ConfigError(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configs that cannot produce a sheet at all.
    ///
    /// Labels that do not fit the page are NOT rejected: the margins simply
    /// go negative and the renderer logs it.
    pub fn validate(&self) -> Result<(), AppError> {
        let sheet = &self.sheet;
        let label = &self.label;

        if sheet.columns == 0 || sheet.rows == 0 {
            return Err(AppError::ConfigError(format!(
                "sheet needs at least one row and column (got {} x {})",
                sheet.columns, sheet.rows
            )));
        }

        let positive = [
            ("sheet.page_width_mm", sheet.page_width_mm),
            ("sheet.page_height_mm", sheet.page_height_mm),
            ("sheet.label_width_mm", sheet.label_width_mm),
            ("sheet.label_height_mm", sheet.label_height_mm),
            ("label.qr_size_mm", label.qr_size_mm),
            ("label.logo_max_width_mm", label.logo_max_width_mm),
            ("label.logo_max_height_mm", label.logo_max_height_mm),
            ("label.font_scale", label.font_scale),
            ("label.text_hscale", label.text_hscale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AppError::ConfigError(format!(
                    "{} must be a positive number (got {})",
                    name, value
                )));
            }
        }

        let finite = [
            ("sheet.gutter_scale", sheet.gutter_scale),
            ("sheet.vertical_offset_mm", sheet.vertical_offset_mm),
            ("label.padding_left_mm", label.padding_left_mm),
            ("label.padding_right_mm", label.padding_right_mm),
            ("label.gap_mm", label.gap_mm),
            ("label.gap_reduction_mm", label.gap_reduction_mm),
            ("label.right_section_top_offset_mm", label.right_section_top_offset_mm),
            ("label.text_gap_mm", label.text_gap_mm),
            ("label.email_pt", label.email_pt),
            ("label.phone_pt", label.phone_pt),
            ("label.id_pt", label.id_pt),
            ("label.phone_line_spacing", label.phone_line_spacing),
            ("label.id_line_spacing", label.id_line_spacing),
            ("label.x_nudge_mm", label.x_nudge_mm),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(AppError::ConfigError(format!("{} must be finite", name)));
            }
        }
        if label.column_shifts.iter().any(|s| !s.is_finite()) {
            return Err(AppError::ConfigError(
                "label.column_shifts must be finite".to_string(),
            ));
        }

        Ok(())
    }
}
