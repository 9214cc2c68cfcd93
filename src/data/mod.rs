/// Data layer: the file the user picked and its local preview.
///
/// Architecture:
/// ```text
///   file dialog (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read bytes, guess MIME → SelectedFile
///   └──────────┘
///        │                      │
///        ▼                      ▼
///   ┌──────────────┐      ┌────────────┐
///   │ SelectedFile │      │ CsvPreview │  headers, row count, sample rows
///   └──────────────┘      └────────────┘
///        │
///        ▼
///   analysis service (multipart upload)
/// ```

pub mod loader;
pub mod model;
