use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use url::Url;

use super::response::{AnalysisResult, parse_response};
use crate::data::model::SelectedFile;
use crate::error::TransportError;

/// Multipart field the service reads the upload from.
pub const FILE_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// AnalysisService – the network port
// ---------------------------------------------------------------------------

/// Something that turns a CSV upload into an [`AnalysisResult`].
///
/// Called from a worker thread; implementations may block.
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, TransportError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Posts the file as `multipart/form-data` to the analysis endpoint.
pub struct HttpAnalysisService {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpAnalysisService {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, endpoint })
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, TransportError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part(FILE_FIELD, part);

        log::debug!(
            "POST {} ({} bytes, {})",
            self.endpoint,
            file.len(),
            file.mime
        );
        let response = self.client.post(self.endpoint.clone()).multipart(form).send()?;
        let status = response.status();
        let body = response.bytes()?;
        log::debug!("{} answered {status} with {} bytes", self.endpoint, body.len());

        interpret(status, &body)
    }
}

/// Combine status and body. The service reports analysis failures as
/// `500 {"success": false, ...}`, so a well-formed failure body wins over the
/// status code; anything else needs a 2xx status.
fn interpret(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<AnalysisResult, TransportError> {
    match parse_response(body) {
        Ok(result @ AnalysisResult::Failure { .. }) => Ok(result),
        Ok(result) if status.is_success() => Ok(result),
        Ok(_) => Err(TransportError::Status(status.as_u16())),
        Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
        Err(err) => Err(TransportError::Malformed(err)),
    }
}

// ---------------------------------------------------------------------------
// Asset URLs
// ---------------------------------------------------------------------------

/// Resolve a plot source for loading. Server-relative paths are joined onto
/// `base`; absolute URLs and `data:` URIs are returned unchanged. Sources that
/// cannot be joined are passed through and left for the image loader to reject.
pub fn resolve_asset_url(base: &Url, src: &str) -> String {
    if Url::parse(src).is_ok() {
        return src.to_string();
    }
    match base.join(src) {
        Ok(url) => url.to_string(),
        Err(err) => {
            log::warn!("cannot resolve plot source '{src}' against {base}: {err}");
            src.to_string()
        }
    }
}
