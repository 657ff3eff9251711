// render: draw a label sheet with printpdf

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, Rgba, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use tracing::{debug, warn};

use crate::config::{FontFamily, LabelStyle, LayoutConfig};
use crate::error::AppError;
use crate::layout::{
    cell_frame, compute_layout, fit_logo, place_label, Frame, LabelContent, Placement, SheetLayout, TextLine,
};
use crate::qr::QrGlyph;
use crate::slots::{assign_slots, SlotAssignment};

const GRID_LINE_PT: f32 = 0.25;
/// Resolution the logo is resampled to before embedding.
const LOGO_DPI: f32 = 300.0;

// ============================================================================
// Inputs
// ============================================================================

/// Everything needed to draw one sheet.
pub struct SheetRequest<'a> {
    pub config: &'a LayoutConfig,
    pub ids: &'a [String],
    pub start_index: usize,
    pub checkin_base: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub logo: Option<&'a DynamicImage>,
    pub show_grid: bool,
}

/// Logo flattened onto white and resampled to print size, ready to embed.
///
/// `width_px`/`height_px` are the source dimensions; they drive the aspect
/// ratio used for layout. The XObject may be smaller.
struct PreparedLogo {
    image: ImageXObject,
    width_px: u32,
    height_px: u32,
}

// ============================================================================
// Logo Loading
// ============================================================================

/// Loads the logo from a file path or an http(s) URL.
///
/// A path that does not exist is not an error: the sheet is drawn without a
/// logo. A file that exists but cannot be decoded, or a URL that cannot be
/// fetched, is.
pub fn load_logo(p: &str) -> Result<Option<DynamicImage>, AppError> {
    let image_bytes = if p.starts_with("http://") || p.starts_with("https://") {
        let response = ureq::get(p)
            .call()
            .map_err(|e| AppError::LogoError(format!("Failed to fetch URL: {}", e)))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| AppError::LogoError(format!("Failed to read response: {}", e)))?;
        bytes
    } else {
        if !Path::new(p).exists() {
            warn!(path = p, "logo not found, labels will be drawn without it");
            return Ok(None);
        }
        std::fs::read(p).map_err(|e| AppError::LogoError(format!("{}: {}", p, e)))?
    };

    let img = ::image::load_from_memory(&image_bytes)
        .map_err(|e| AppError::LogoError(format!("Failed to decode image: {}", e)))?;

    Ok(Some(img))
}

fn prepare_logo(logo_image: &DynamicImage, style: &LabelStyle) -> PreparedLogo {
    let source = logo_image.to_rgba8();
    let (width_px, height_px) = source.dimensions();

    // Never embed more pixels than the largest fitted logo needs at LOGO_DPI
    let (max_w_mm, max_h_mm) = fit_logo(
        style.logo_max_width_mm,
        style.logo_max_height_mm,
        width_px,
        height_px,
    );
    let target_w = mm_to_px(max_w_mm).min(width_px).max(1);
    let target_h = mm_to_px(max_h_mm).min(height_px).max(1);
    let rgba_image = if (target_w, target_h) == (width_px, height_px) {
        source
    } else {
        imageops::resize(&source, target_w, target_h, FilterType::Triangle)
    };
    let (out_w, out_h) = rgba_image.dimensions();

    // Composite against white background
    let mut rgb_image = RgbImage::new(out_w, out_h);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, ::image::Rgb([out_r, out_g, out_b]));
    }

    let image = ImageXObject {
        width: Px(out_w as usize),
        height: Px(out_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    PreparedLogo {
        image,
        width_px,
        height_px,
    }
}

fn mm_to_px(mm: f32) -> u32 {
    (mm / 25.4 * LOGO_DPI).ceil().max(0.0) as u32
}

// ============================================================================
// Sheet Rendering
// ============================================================================

/// Draws one sheet and saves it to `output_path`.
///
/// Returns the slots that received a label, in slot order.
pub fn render_sheet<'a>(
    request: &SheetRequest<'a>,
    output_path: &Path,
) -> Result<Vec<SlotAssignment<'a>>, AppError> {
    let config = request.config;
    let sheet = &config.sheet;

    let layout = compute_layout(sheet);
    debug!(?layout, "computed sheet layout");
    if sheet.overflows_page() {
        warn!(
            margin_left_mm = layout.margin_left_mm,
            margin_top_mm = layout.margin_top_mm,
            "labels do not fit the page, margins are negative"
        );
    }

    let total_slots = sheet.total_slots();
    let assignments = assign_slots(request.ids, request.start_index, total_slots);
    if assignments.len() < request.ids.len() {
        warn!(
            dropped = request.ids.len() - assignments.len(),
            "more IDs than free slots, the rest were not placed"
        );
    }

    let (doc, page1, layer1) = PdfDocument::new(
        "QR Label Sheet",
        Mm(sheet.page_width_mm),
        Mm(sheet.page_height_mm),
        "Labels",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let font = doc
        .add_builtin_font(builtin_bold(config.font))
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    if request.show_grid {
        draw_grid(&layer, config, &layout, total_slots);
    }

    let logo = request.logo.map(|img| prepare_logo(img, &config.label));
    let logo_px = logo.as_ref().map(|l| (l.width_px, l.height_px));

    layer.set_fill_color(black());
    for assignment in &assignments {
        let content = LabelContent::new(
            assignment.id,
            request.checkin_base,
            request.email,
            request.phone,
        );
        let placement = place_label(config, &layout, &content, assignment.slot, logo_px);
        debug!(
            slot = placement.slot,
            id = %content.id,
            payload = %content.payload,
            cell_x_mm = placement.cell.x_mm,
            cell_top_mm = placement.cell.top(),
            "placing label"
        );
        for line in placement.overflowing_lines(config.label.text_hscale) {
            warn!(slot = placement.slot, text = %line.text, "text is wider than its label column");
        }

        draw_label(&layer, &font, config, &content, &placement, logo.as_ref())?;
    }

    let file = File::create(output_path).map_err(|e| {
        std::io::Error::new(e.kind(), format!("{}: {}", output_path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    Ok(assignments)
}

fn builtin_bold(family: FontFamily) -> BuiltinFont {
    match family {
        FontFamily::Helvetica => BuiltinFont::HelveticaBold,
        FontFamily::Times => BuiltinFont::TimesBold,
        FontFamily::Courier => BuiltinFont::CourierBold,
    }
}

fn draw_label(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    config: &LayoutConfig,
    content: &LabelContent,
    placement: &Placement,
    logo: Option<&PreparedLogo>,
) -> Result<(), AppError> {
    let glyph = QrGlyph::encode(&content.payload)?;
    for module in glyph.module_frames(&placement.qr, config.label.qr_quiet_zone) {
        fill_rect(layer, &module);
    }

    if let (Some(logo), Some(frame)) = (logo, placement.logo.as_ref()) {
        embed_logo(layer, logo, frame);
    }

    for line in &placement.lines {
        draw_condensed_text(layer, font, line, config.label.text_hscale);
    }

    Ok(())
}

fn embed_logo(layer: &PdfLayerReference, logo: &PreparedLogo, frame: &Frame) {
    if frame.width_mm <= 0.0 || frame.height_mm <= 0.0 {
        return;
    }

    // DPI that maps the embedded pixel width onto the fitted width
    let dpi = logo.image.width.0 as f32 / (frame.width_mm / 25.4);

    Image::from(logo.image.clone()).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(frame.x_mm)),
            translate_y: Some(Mm(frame.y_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// Text under a horizontal scale; `origin_x_mm` already compensates for it.
fn draw_condensed_text(layer: &PdfLayerReference, font: &IndirectFontRef, line: &TextLine, hscale: f32) {
    layer.save_graphics_state();
    layer.set_ctm(CurTransMat::Scale(hscale, 1.0));
    layer.use_text(
        &line.text,
        line.font_size_pt,
        Mm(line.origin_x_mm),
        Mm(line.baseline_mm),
        font,
    );
    layer.restore_graphics_state();
}

fn draw_grid(
    layer: &PdfLayerReference,
    config: &LayoutConfig,
    layout: &SheetLayout,
    total_slots: usize,
) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.83, 0.83, 0.83, None)));
    layer.set_outline_thickness(GRID_LINE_PT);

    for slot in 1..=total_slots {
        let cell = cell_frame(config, layout, slot);
        layer.add_line(Line {
            points: frame_points(&cell),
            is_closed: true,
        });
    }
}

// ============================================================================
// Drawing Utilities
// ============================================================================

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn frame_points(frame: &Frame) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(frame.x_mm), Mm(frame.y_mm)), false),
        (Point::new(Mm(frame.right()), Mm(frame.y_mm)), false),
        (Point::new(Mm(frame.right()), Mm(frame.top())), false),
        (Point::new(Mm(frame.x_mm), Mm(frame.top())), false),
    ]
}

fn fill_rect(layer: &PdfLayerReference, frame: &Frame) {
    layer.add_polygon(Polygon {
        rings: vec![frame_points(frame)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
}
