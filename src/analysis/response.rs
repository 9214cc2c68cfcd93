use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// AnalysisResult – the validated service response
// ---------------------------------------------------------------------------

/// Decoded body of `POST /analyze-pca/`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success(AnalysisReport),
    Failure { error: String },
}

/// Payload of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// PCA biplot image (URL, server-relative path or data URI).
    pub pca_plot: String,
    /// Correlation-matrix heatmap image.
    pub correlation_plot: String,
    /// Scree plot image.
    pub scree_plot: String,
    /// Explained variance per component, in the order the server wrote it.
    pub explained_variance: Vec<VarianceEntry>,
}

/// One `"<component>": <value>` pair of `explained_variance`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceEntry {
    pub component: String,
    pub value: VarianceValue,
}

impl VarianceEntry {
    pub fn new(component: impl Into<String>, value: VarianceValue) -> Self {
        Self {
            component: component.into(),
            value,
        }
    }

    /// The `"<label>: <value>"` line shown in the summary list.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.component, self.value)
    }

    /// Trailing integer of the label, e.g. `12` for `PC12`.
    pub fn component_index(&self) -> Option<u32> {
        let digits_start = self
            .component
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i)?;
        self.component[digits_start..].parse().ok()
    }
}

// ---------------------------------------------------------------------------
// VarianceValue – server-formatted string or bare number
// ---------------------------------------------------------------------------

/// The service formats values as strings like `"45.20%"`; bare numbers are
/// accepted too and shown as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VarianceValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for VarianceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarianceValue::Text(s) => write!(f, "{s}"),
            VarianceValue::Number(v) => write!(f, "{v}"),
        }
    }
}

impl VarianceValue {
    /// Numeric percentage for charting; `None` if the text is not a number.
    ///
    /// Bare numbers are taken to be percentages already: `45.2` charts as 45.2 %
    /// and a fraction such as `0.452` charts as 0.452 %, not 45.2 %.
    pub fn percent(&self) -> Option<f64> {
        match self {
            VarianceValue::Number(v) => Some(*v),
            VarianceValue::Text(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering of the variance summary
// ---------------------------------------------------------------------------

/// How the explained-variance lines are ordered for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceOrder {
    /// Keep the key order of the response body.
    #[default]
    Server,
    /// Sort by the trailing component index (`PC2` before `PC10`).
    Component,
}

impl VarianceOrder {
    /// Reorder `entries` in place. The sort is stable; labels without an index
    /// go last in their original order.
    pub fn apply(self, entries: &mut [VarianceEntry]) {
        match self {
            VarianceOrder::Server => {}
            VarianceOrder::Component => {
                entries.sort_by_key(|e| e.component_index().map_or((1, 0), |i| (0, i)));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing & validation
// ---------------------------------------------------------------------------

/// Why a response body could not be turned into an [`AnalysisResult`].
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Wire shape before validation: every field optional so that missing ones
/// produce a precise error instead of a generic serde message.
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: Option<bool>,
    error: Option<String>,
    pca_plot: Option<String>,
    correlation_plot: Option<String>,
    scree_plot: Option<String>,
    explained_variance: Option<IndexMap<String, VarianceValue>>,
}

/// Parse and validate a response body.
pub fn parse_response(body: &[u8]) -> Result<AnalysisResult, ResponseError> {
    let raw: RawResponse = serde_json::from_slice(body)?;
    raw.try_into()
}

impl TryFrom<RawResponse> for AnalysisResult {
    type Error = ResponseError;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        match raw.success {
            None => Err(ResponseError::MissingField("success")),
            Some(false) => Ok(AnalysisResult::Failure {
                error: raw.error.ok_or(ResponseError::MissingField("error"))?,
            }),
            Some(true) => {
                let explained_variance = raw
                    .explained_variance
                    .ok_or(ResponseError::MissingField("explained_variance"))?
                    .into_iter()
                    .map(|(component, value)| VarianceEntry::new(component, value))
                    .collect();

                Ok(AnalysisResult::Success(AnalysisReport {
                    pca_plot: raw.pca_plot.ok_or(ResponseError::MissingField("pca_plot"))?,
                    correlation_plot: raw
                        .correlation_plot
                        .ok_or(ResponseError::MissingField("correlation_plot"))?,
                    scree_plot: raw
                        .scree_plot
                        .ok_or(ResponseError::MissingField("scree_plot"))?,
                    explained_variance,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_body() -> &'static str {
        r#"{
            "success": true,
            "pca_plot": "/static/PCA_1a2b3c4d.png",
            "correlation_plot": "/static/Correlation_1a2b3c4d.png",
            "scree_plot": "/static/Scree_1a2b3c4d.png",
            "explained_variance": {"PC1": "45.20%", "PC10": "0.40%", "PC2": "30.10%"}
        }"#
    }

    #[test]
    fn success_keeps_server_key_order() {
        let AnalysisResult::Success(report) = parse_response(success_body().as_bytes()).unwrap()
        else {
            panic!("expected success");
        };
        assert_eq!(report.pca_plot, "/static/PCA_1a2b3c4d.png");
        assert_eq!(report.scree_plot, "/static/Scree_1a2b3c4d.png");
        let lines: Vec<String> = report
            .explained_variance
            .iter()
            .map(VarianceEntry::display_line)
            .collect();
        assert_eq!(lines, ["PC1: 45.20%", "PC10: 0.40%", "PC2: 30.10%"]);
    }

    #[test]
    fn failure_carries_server_message() {
        let result =
            parse_response(br#"{"success": false, "error": "No columns to parse from file"}"#)
                .unwrap();
        assert_eq!(
            result,
            AnalysisResult::Failure {
                error: "No columns to parse from file".into()
            }
        );
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let err = parse_response(br#"{"success": true, "pca_plot": "a.png"}"#).unwrap_err();
        assert!(matches!(err, ResponseError::MissingField("explained_variance")));

        let err = parse_response(br#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, ResponseError::MissingField("error")));

        let err = parse_response(br#"{"detail": "Not Found"}"#).unwrap_err();
        assert!(matches!(err, ResponseError::MissingField("success")));
    }

    #[test]
    fn non_json_body_is_rejected() {
        let err = parse_response(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ResponseError::Json(_)));
    }

    #[test]
    fn wrongly_typed_field_is_rejected() {
        let body = br#"{"success": true, "pca_plot": 7, "correlation_plot": "b",
                        "scree_plot": "c", "explained_variance": {}}"#;
        assert!(matches!(parse_response(body), Err(ResponseError::Json(_))));
    }

    #[test]
    fn numeric_variance_values_are_accepted() {
        let body = br#"{"success": true, "pca_plot": "a", "correlation_plot": "b",
                        "scree_plot": "c", "explained_variance": {"PC1": 61.5}}"#;
        let AnalysisResult::Success(report) = parse_response(body).unwrap() else {
            panic!("expected success");
        };
        assert_eq!(report.explained_variance[0].display_line(), "PC1: 61.5");
        assert_eq!(report.explained_variance[0].value.percent(), Some(61.5));
    }

    #[test]
    fn percent_parses_formatted_strings() {
        assert_eq!(VarianceValue::Text("45.20%".into()).percent(), Some(45.2));
        assert_eq!(VarianceValue::Text(" 3 % ".into()).percent(), Some(3.0));
        assert_eq!(VarianceValue::Text("n/a".into()).percent(), None);
    }

    #[test]
    fn bare_numbers_are_not_rescaled() {
        assert_eq!(VarianceValue::Number(45.2).percent(), Some(45.2));
        assert_eq!(VarianceValue::Number(0.452).percent(), Some(0.452));
    }

    #[test]
    fn component_order_sorts_numerically() {
        let text = |s: &str| VarianceValue::Text(s.into());
        let mut entries = vec![
            VarianceEntry::new("PC10", text("1%")),
            VarianceEntry::new("total", text("100%")),
            VarianceEntry::new("PC2", text("30%")),
            VarianceEntry::new("PC1", text("45%")),
        ];
        VarianceOrder::Component.apply(&mut entries);
        let labels: Vec<&str> = entries.iter().map(|e| e.component.as_str()).collect();
        assert_eq!(labels, ["PC1", "PC2", "PC10", "total"]);

        VarianceOrder::Server.apply(&mut entries);
        let labels: Vec<&str> = entries.iter().map(|e| e.component.as_str()).collect();
        assert_eq!(labels, ["PC1", "PC2", "PC10", "total"]);
    }

    #[test]
    fn component_index_reads_trailing_digits() {
        let entry = |s: &str| VarianceEntry::new(s, VarianceValue::Number(0.0));
        assert_eq!(entry("PC12").component_index(), Some(12));
        assert_eq!(entry("Dim.3").component_index(), Some(3));
        assert_eq!(entry("PCA").component_index(), None);
    }
}
