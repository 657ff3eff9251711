//! Sheet layout engine.
//!
//! Turns a [`LayoutConfig`] and per-label content into absolute page
//! coordinates. Everything here is in millimetres with the origin at the
//! bottom-left of the page, the way printpdf expects it. Nothing in this
//! module touches the PDF document.

use crate::config::{LayoutConfig, SheetSpec, TextAlign, PT_TO_MM};
use crate::metrics::measure_text_mm;
use crate::qr::checkin_payload;

/// Page-level placement of the label grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub gutter_x_mm: f32,
}

/// Axis-aligned box; `y_mm` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Frame {
    pub fn top(&self) -> f32 {
        self.y_mm + self.height_mm
    }

    pub fn right(&self) -> f32 {
        self.x_mm + self.width_mm
    }

    pub fn center_x(&self) -> f32 {
        self.x_mm + self.width_mm / 2.0
    }
}

/// Content of one populated slot.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelContent {
    pub id: String,
    pub payload: String,
    pub email: String,
    pub phone: String,
}

impl LabelContent {
    pub fn new(id: &str, checkin_base: &str, email: &str, phone: &str) -> Self {
        Self {
            id: id.to_string(),
            payload: checkin_payload(checkin_base, id),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// One line of condensed text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size_pt: f32,
    pub baseline_mm: f32,
    /// Width at full horizontal scale
    pub natural_width_mm: f32,
    /// x to hand to the text operator while the condensing transform is active
    pub origin_x_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub slot: usize,
    pub cell: Frame,
    pub qr: Frame,
    /// Logo/text column to the right of the QR
    pub column: Frame,
    pub logo: Option<Frame>,
    /// Email, phone, identifier (top to bottom)
    pub lines: [TextLine; 3],
}

impl Placement {
    /// Text lines whose condensed width is wider than the column.
    pub fn overflowing_lines(&self, hscale: f32) -> impl Iterator<Item = &TextLine> + '_ {
        let available = self.column.width_mm;
        self.lines
            .iter()
            .filter(move |line| line.natural_width_mm * hscale > available)
    }
}

impl SheetSpec {
    /// True when the labels are wider or taller than the page. Margins go
    /// negative in that case; nothing is clamped.
    pub fn overflows_page(&self) -> bool {
        self.columns as f32 * self.label_width_mm > self.page_width_mm
            || self.rows as f32 * self.label_height_mm > self.page_height_mm
    }
}

/// Equal left/right margins around columns separated by a scaled gutter;
/// rows are centred vertically with no gutter, then lifted by the offset.
pub fn compute_layout(spec: &SheetSpec) -> SheetLayout {
    let cols = spec.columns as f32;
    let rows = spec.rows as f32;
    let total_w = cols * spec.label_width_mm;
    let total_h = rows * spec.label_height_mm;

    let base_gutter_x = (spec.page_width_mm - total_w) / (cols + 1.0);
    let gutter_x = base_gutter_x * spec.gutter_scale;

    let margin_left = (spec.page_width_mm - total_w - (cols - 1.0) * gutter_x) / 2.0;
    let margin_top = (spec.page_height_mm - total_h) / 2.0 - spec.vertical_offset_mm;

    SheetLayout {
        margin_left_mm: margin_left,
        margin_top_mm: margin_top,
        gutter_x_mm: gutter_x,
    }
}

/// Cell frame for a 1-based row-major slot, including the column nudge.
pub fn cell_frame(config: &LayoutConfig, layout: &SheetLayout, slot: usize) -> Frame {
    let spec = &config.sheet;
    let index = slot.saturating_sub(1);
    let cols = spec.columns.max(1) as usize;
    let row = index / cols;
    let col = index % cols;

    let mut x = layout.margin_left_mm + col as f32 * (spec.label_width_mm + layout.gutter_x_mm);
    x += spec.label_width_mm * config.label.column_shift(col);
    let top = spec.page_height_mm - layout.margin_top_mm - row as f32 * spec.label_height_mm;

    Frame {
        x_mm: x,
        y_mm: top - spec.label_height_mm,
        width_mm: spec.label_width_mm,
        height_mm: spec.label_height_mm,
    }
}

/// Largest box inside `max_w` x `max_h` with the image's aspect ratio.
pub fn fit_logo(max_w: f32, max_h: f32, width_px: u32, height_px: u32) -> (f32, f32) {
    let aspect = if height_px > 0 {
        width_px as f32 / height_px as f32
    } else {
        1.0
    };

    if max_h * aspect <= max_w {
        (max_h * aspect, max_h)
    } else {
        (max_w, max_w / aspect.max(1e-6))
    }
}

/// Pre-scale x for text drawn under a horizontal scale of `hscale`.
///
/// The drawing transform multiplies x by `hscale`, so the anchor is divided
/// back out. For centred text the natural (unscaled) half-width is then
/// subtracted, which after scaling lands the visual centre on `anchor_x`.
pub fn condensed_origin(anchor_x: f32, natural_width: f32, hscale: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => anchor_x / hscale,
        TextAlign::Center => anchor_x / hscale - natural_width / 2.0,
    }
}

pub fn place_label(
    config: &LayoutConfig,
    layout: &SheetLayout,
    content: &LabelContent,
    slot: usize,
    logo_px: Option<(u32, u32)>,
) -> Placement {
    let style = &config.label;
    let cell = cell_frame(config, layout, slot);

    let x_left = cell.x_mm + style.padding_left_mm + style.x_nudge_mm;
    let x_right = cell.right() - style.padding_right_mm + style.x_nudge_mm;
    let usable_w = x_right - x_left;

    let qr = Frame {
        x_mm: x_left,
        y_mm: cell.top() - (cell.height_mm - style.qr_size_mm) / 2.0 - style.qr_size_mm,
        width_mm: style.qr_size_mm,
        height_mm: style.qr_size_mm,
    };

    let gap = (style.gap_mm - style.gap_reduction_mm).max(0.0);
    let column = Frame {
        x_mm: qr.right() + gap,
        y_mm: cell.y_mm,
        width_mm: usable_w - (style.qr_size_mm + gap),
        height_mm: cell.height_mm,
    };

    let logo = logo_px.map(|(w_px, h_px)| {
        let max_w = style.logo_max_width_mm.min(column.width_mm).max(0.0);
        let (w, h) = fit_logo(max_w, style.logo_max_height_mm, w_px, h_px);
        let top = qr.top() - style.right_section_top_offset_mm;
        Frame {
            x_mm: column.x_mm + (column.width_mm - w) / 2.0,
            y_mm: top - h,
            width_mm: w,
            height_mm: h,
        }
    });

    let start_top = match &logo {
        Some(frame) => frame.y_mm - style.text_gap_mm,
        None => qr.top() - style.text_gap_mm,
    };

    let anchor_x = match style.text_align {
        TextAlign::Center => column.center_x(),
        TextAlign::Left => column.x_mm,
    };
    let email_pt = style.email_pt * style.font_scale;
    let phone_pt = style.phone_pt * style.font_scale;
    let id_pt = style.id_pt * style.font_scale;

    let email_y = start_top - email_pt * PT_TO_MM;
    let phone_y = email_y - phone_pt * style.phone_line_spacing * PT_TO_MM;
    let id_y = phone_y - id_pt * style.id_line_spacing * PT_TO_MM;

    let line = |text: &str, size: f32, baseline: f32| {
        let natural = measure_text_mm(text, config.font, size);
        TextLine {
            text: text.to_string(),
            font_size_pt: size,
            baseline_mm: baseline,
            natural_width_mm: natural,
            origin_x_mm: condensed_origin(anchor_x, natural, style.text_hscale, style.text_align),
        }
    };

    Placement {
        slot,
        cell,
        qr,
        column,
        logo,
        lines: [
            line(&content.email, email_pt, email_y),
            line(&content.phone, phone_pt, phone_y),
            line(&content.id, id_pt, id_y),
        ],
    }
}
