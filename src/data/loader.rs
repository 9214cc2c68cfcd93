use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{CsvPreview, SelectedFile};

/// Rows kept in [`CsvPreview::sample_rows`].
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a file picked by the user. The contents are kept as-is; the service
/// does the parsing.
pub fn load_selected_file(path: &Path) -> Result<SelectedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let mut file = SelectedFile::from_bytes(name, bytes);
    file.path = path.to_path_buf();
    Ok(file)
}

// ---------------------------------------------------------------------------
// CSV preview
// ---------------------------------------------------------------------------

/// Summarise a CSV: header row, number of records and the first
/// [`PREVIEW_ROWS`] rows. Ragged rows are tolerated.
pub fn preview_csv(bytes: &[u8]) -> Result<CsvPreview> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        bail!("CSV has no header row");
    }

    let mut row_count = 0;
    let mut sample_rows = Vec::with_capacity(PREVIEW_ROWS);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if sample_rows.len() < PREVIEW_ROWS {
            sample_rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        row_count += 1;
    }

    Ok(CsvPreview {
        headers,
        row_count,
        sample_rows,
    })
}
