use std::path::PathBuf;

// ---------------------------------------------------------------------------
// SelectedFile – the blob handed to the analysis service
// ---------------------------------------------------------------------------

/// A user-chosen file, read once at selection time.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// Where the file was picked from (display only).
    pub path: PathBuf,
    /// File name sent as the multipart `filename`.
    pub name: String,
    /// Content type sent with the multipart part.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Build a file from memory; `mime` is guessed from the name.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name).to_string();
        Self {
            path: PathBuf::from(&name),
            name,
            mime,
            bytes,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Content type for a file name, the way a browser form would label it.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// CsvPreview – local summary shown before uploading
// ---------------------------------------------------------------------------

/// Header and shape of the selected CSV, plus the first few rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvPreview {
    /// Column names as written in the header row.
    pub headers: Vec<String>,
    /// Number of data rows (header excluded).
    pub row_count: usize,
    /// Leading rows for the side panel.
    pub sample_rows: Vec<Vec<String>>,
}

impl CsvPreview {
    /// First column holds the row labels; the rest are the analysed variables.
    pub fn variable_count(&self) -> usize {
        self.headers.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_name("data.csv"), "text/csv");
        assert_eq!(mime_for_name("DATA.CSV"), "text/csv");
        assert_eq!(mime_for_name("notes.txt"), "text/plain");
        assert_eq!(mime_for_name("archive"), "application/octet-stream");
    }

    #[test]
    fn from_bytes_fills_name_and_mime() {
        let file = SelectedFile::from_bytes("data.csv", b"id,a\nx,1\n".to_vec());
        assert_eq!(file.name, "data.csv");
        assert_eq!(file.mime, "text/csv");
        assert_eq!(file.len(), 9);
    }
}
