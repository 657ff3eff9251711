//! QR payloads and vector module geometry.

use qrcode::{Color, QrCode};

use crate::error::AppError;
use crate::layout::Frame;

/// Check-in URL for an identifier: base URL with trailing slashes trimmed,
/// then `/<id>`.
pub fn checkin_payload(checkin_base: &str, id: &str) -> String {
    format!("{}/{}", checkin_base.trim_end_matches('/'), id)
}

/// Horizontal run of dark modules, in module coordinates (row 0 at top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRun {
    pub row: usize,
    pub col: usize,
    pub len: usize,
}

/// An encoded symbol reduced to the runs that need ink.
#[derive(Debug, Clone)]
pub struct QrGlyph {
    pub width: usize,
    pub runs: Vec<ModuleRun>,
}

impl QrGlyph {
    pub fn encode(payload: &str) -> Result<Self, AppError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| AppError::QrError(format!("{}: {}", payload, e)))?;
        let width = code.width();
        let runs = dark_runs(&code.to_colors(), width);
        Ok(Self { width, runs })
    }

    /// Rectangles (mm) for every dark run, scaled so the symbol plus its
    /// quiet zone fills `frame`.
    pub fn module_frames(&self, frame: &Frame, quiet_zone: u32) -> Vec<Frame> {
        let qz = quiet_zone as usize;
        let total = (self.width + 2 * qz) as f32;
        let module_w = frame.width_mm / total;
        let module_h = frame.height_mm / total;

        self.runs
            .iter()
            .map(|run| Frame {
                x_mm: frame.x_mm + (qz + run.col) as f32 * module_w,
                y_mm: frame.top() - (qz + run.row + 1) as f32 * module_h,
                width_mm: run.len as f32 * module_w,
                height_mm: module_h,
            })
            .collect()
    }
}

fn dark_runs(colors: &[Color], width: usize) -> Vec<ModuleRun> {
    let mut runs = Vec::new();
    if width == 0 {
        return runs;
    }

    for (row, modules) in colors.chunks(width).enumerate() {
        let mut start: Option<usize> = None;
        for (col, color) in modules.iter().enumerate() {
            match (color, start) {
                (Color::Dark, None) => start = Some(col),
                (Color::Light, Some(s)) => {
                    runs.push(ModuleRun { row, col: s, len: col - s });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(ModuleRun { row, col: s, len: width - s });
        }
    }

    runs
}
