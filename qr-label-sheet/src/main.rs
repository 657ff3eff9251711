// qr-label-sheet: Generate QR-coded inventory label sheets (Avery L7651)

mod config;
mod error;
mod export;
mod ids;
mod layout;
mod metrics;
mod qr;
mod render;
mod slots;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{FontFamily, LayoutConfig};
use crate::error::AppError;
use crate::render::{load_logo, render_sheet, SheetRequest};

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate QR-coded inventory label sheets (Avery L7651, 65/A4)")]
struct Args {
    /// Logo image (file path or URL); a missing file is skipped
    #[arg(long, default_value = "assets/logo.png")]
    logo: String,

    /// Base URL for the QR payload, e.g. https://your-host/check-in
    #[arg(long, default_value = "http://localhost:3000/check-in")]
    checkin_base: String,

    /// Email text
    #[arg(long, default_value = "admin@example.com")]
    email: String,

    /// Phone text
    #[arg(long, default_value = "+61 8 8340 4469")]
    phone: String,

    /// Output PDF path
    #[arg(short, long, default_value = "labels_L7651.pdf")]
    out: PathBuf,

    /// Optional output CSV mapping slot to ID
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Overlay label cell boundaries for alignment
    #[arg(long)]
    show_grid: bool,

    /// Scale all text sizes uniformly (overrides the config)
    #[arg(long)]
    font_scale: Option<f32>,

    /// Font family for label text (overrides the config)
    #[arg(long, value_enum)]
    font: Option<FontFamily>,

    /// Text or JSON file with IDs (one per line or a JSON array)
    #[arg(long)]
    ids_file: Option<PathBuf>,

    /// Comma-separated list of IDs to print
    #[arg(long)]
    ids: Option<String>,

    /// 1-based start slot on the sheet (for partly used sheets); values
    /// below 1 start at slot 1
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    start_index: i64,

    /// Layout config JSON; any field left out keeps its default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective layout config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qr_label_sheet=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let config = effective_config(&args)?;

    if args.dump_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let (ids, origin) = ids::resolve_ids(
        args.ids_file.as_deref(),
        args.ids.as_deref(),
        config.sheet.total_slots(),
    )?;

    let logo = load_logo(&args.logo)?;

    let request = SheetRequest {
        config: &config,
        ids: &ids,
        start_index: start_slot(args.start_index),
        checkin_base: &args.checkin_base,
        email: &args.email,
        phone: &args.phone,
        logo: logo.as_ref(),
        show_grid: args.show_grid,
    };
    let placed = render_sheet(&request, &args.out)?;
    info!(placed = placed.len(), ?origin, "sheet rendered");

    if let Some(csv_path) = &args.csv {
        export::write_slot_csv(csv_path, &placed)?;
    }

    println!("✓ Generated: {}", args.out.display());
    if let Some(csv_path) = &args.csv {
        println!("  IDs: {}", csv_path.display());
    }
    println!("  Labels: {} (slots {})", placed.len(), slot_range(&placed));

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Defaults, then the config file, then CLI overrides.
fn effective_config(args: &Args) -> Result<LayoutConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };

    if let Some(scale) = args.font_scale {
        config.label.font_scale = scale;
    }
    if let Some(font) = args.font {
        config.font = font;
    }

    config.validate()?;
    Ok(config)
}

/// Clamps the requested start slot to at least 1.
fn start_slot(requested: i64) -> usize {
    usize::try_from(requested.max(1)).unwrap_or(usize::MAX)
}

fn slot_range(placed: &[slots::SlotAssignment<'_>]) -> String {
    match (placed.first(), placed.last()) {
        (Some(first), Some(last)) => format!("{}-{}", first.slot, last.slot),
        _ => "none".to_string(),
    }
}
