use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qr-label-sheet"))
}

fn setup() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

fn read_csv_rows(path: &Path) -> Vec<(usize, String)> {
    let content = fs::read_to_string(path).expect("Failed to read CSV");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("slot,id"));
    lines
        .map(|line| {
            let (slot, id) = line.split_once(',').expect("row without comma");
            (slot.parse().expect("slot is not a number"), id.to_string())
        })
        .collect()
}

fn assert_pdf(path: &Path) {
    assert!(path.exists(), "PDF file was not created");
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_random_full_sheet() {
    let dir = setup();
    let pdf = dir.path().join("random.pdf");
    let csv = dir.path().join("random.csv");

    let output = cargo_bin()
        .args([
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(&pdf);

    let rows = read_csv_rows(&csv);
    assert_eq!(rows.len(), 65);
    assert_eq!(rows.first().unwrap().0, 1);
    assert_eq!(rows.last().unwrap().0, 65);
}

#[test]
fn test_partial_sheet_from_slot_ten() {
    let dir = setup();
    let pdf = dir.path().join("partial.pdf");
    let csv = dir.path().join("partial.csv");

    let output = cargo_bin()
        .args([
            "--ids", "A1,A2,A3,A4,A5",
            "--start-index", "10",
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(&pdf);

    let rows = read_csv_rows(&csv);
    let expected: Vec<(usize, String)> = (10..=14)
        .zip(["A1", "A2", "A3", "A4", "A5"])
        .map(|(slot, id)| (slot, id.to_string()))
        .collect();
    assert_eq!(rows, expected);
}

#[test]
fn test_ids_file_json_array() {
    let dir = setup();
    let ids = dir.path().join("ids.json");
    fs::write(&ids, r#"["Q7", "Q8", "Q9"]"#).unwrap();
    let pdf = dir.path().join("json.pdf");
    let csv = dir.path().join("json.csv");

    let output = cargo_bin()
        .args([
            "--ids-file", path_arg(&ids),
            "--ids", "IGNORED",
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let rows = read_csv_rows(&csv);
    assert_eq!(
        rows,
        vec![(1, "Q7".to_string()), (2, "Q8".to_string()), (3, "Q9".to_string())]
    );
}

#[test]
fn test_empty_ids_file_gives_blank_sheet() {
    let dir = setup();
    let ids = dir.path().join("ids.txt");
    fs::write(&ids, "\n  \n").unwrap();
    let pdf = dir.path().join("blank.pdf");
    let csv = dir.path().join("blank.csv");

    let output = cargo_bin()
        .args([
            "--ids-file", path_arg(&ids),
            "--ids", "NOT,USED",
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));
    assert!(read_csv_rows(&csv).is_empty());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Labels: 0"));
}

#[test]
fn test_negative_start_index_starts_at_first_slot() {
    let dir = setup();
    let pdf = dir.path().join("neg.pdf");
    let csv = dir.path().join("neg.csv");

    let output = cargo_bin()
        .args([
            "--ids", "N1,N2",
            "--start-index", "-3",
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        read_csv_rows(&csv),
        vec![(1, "N1".to_string()), (2, "N2".to_string())]
    );
}

#[test]
fn test_ids_file_lines_fallback() {
    let dir = setup();
    let ids = dir.path().join("ids.txt");
    fs::write(&ids, "L1\n\nL2\n  L3  \n").unwrap();
    let pdf = dir.path().join("lines.pdf");
    let csv = dir.path().join("lines.csv");

    let output = cargo_bin()
        .args([
            "--ids-file", path_arg(&ids),
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let ids: Vec<String> = read_csv_rows(&csv).into_iter().map(|(_, id)| id).collect();
    assert_eq!(ids, vec!["L1", "L2", "L3"]);
}

#[test]
fn test_with_logo_and_grid() {
    let dir = setup();
    let logo = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(60, 30, image::Rgba([0, 80, 160, 255]))
        .save(&logo)
        .unwrap();
    let pdf = dir.path().join("logo.pdf");

    let output = cargo_bin()
        .args([
            "--logo", path_arg(&logo),
            "--ids", "LOGO1,LOGO2",
            "--show-grid",
            "--font", "times",
            "--font-scale", "1.0",
            "-o", path_arg(&pdf),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_pdf(&pdf);
}

#[test]
fn test_config_file_and_dump() {
    let dir = setup();
    let config = dir.path().join("layout.json");
    fs::write(&config, r#"{"sheet": {"rows": 2}, "label": {"text_hscale": 1.0}}"#).unwrap();

    let output = cargo_bin()
        .args(["--config", path_arg(&config), "--dump-config"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let dumped: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dumped["sheet"]["rows"], 2);
    assert_eq!(dumped["sheet"]["columns"], 5);
    assert_eq!(dumped["label"]["text_hscale"], 1.0);
}

#[test]
fn test_config_limits_slots() {
    let dir = setup();
    let config = dir.path().join("layout.json");
    fs::write(&config, r#"{"sheet": {"rows": 2}}"#).unwrap();
    let pdf = dir.path().join("small.pdf");
    let csv = dir.path().join("small.csv");

    let output = cargo_bin()
        .args([
            "--config", path_arg(&config),
            "--logo", "no-such-logo.png",
            "-o", path_arg(&pdf),
            "--csv", path_arg(&csv),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(read_csv_rows(&csv).len(), 10);
}

#[test]
fn test_missing_output_directory() {
    let dir = setup();
    let pdf = dir.path().join("missing").join("out.pdf");

    let output = cargo_bin()
        .args(["--ids", "X", "--logo", "no-such-logo.png", "-o", path_arg(&pdf)])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing directory");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_invalid_config_file() {
    let dir = setup();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"sheet": {"columns": 0}}"#).unwrap();

    let output = cargo_bin()
        .args(["--config", path_arg(&config), "-o", path_arg(&dir.path().join("x.pdf"))])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for zero columns");
    assert!(!dir.path().join("x.pdf").exists());
}

#[test]
fn test_corrupt_logo_fails() {
    let dir = setup();
    let logo = dir.path().join("broken.png");
    fs::write(&logo, b"definitely not a png").unwrap();

    let output = cargo_bin()
        .args([
            "--logo", path_arg(&logo),
            "--ids", "X",
            "-o", path_arg(&dir.path().join("x.pdf")),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for undecodable logo");
}
