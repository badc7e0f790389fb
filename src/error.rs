use serde::Serialize;
use thiserror::Error;

/// Failures that stop a file from becoming a table. These are the caller's
/// problem (bad or empty input) rather than ours.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type for '{filename}'")]
    UnsupportedFormat { filename: String },
    #[error("No data rows found in the first worksheet of '{filename}'")]
    EmptySheet { filename: String },
    #[error("No data rows found in '{filename}'")]
    EmptyFile { filename: String },
    #[error("Could not decode '{filename}': {reason}")]
    MalformedInput { filename: String, reason: String },
}

impl LoadError {
    pub fn malformed(filename: &str, reason: impl ToString) -> Self {
        LoadError::MalformedInput {
            filename: filename.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            LoadError::UnsupportedFormat { .. } => {
                "Upload an Excel workbook (.xlsx, .xls) or a delimited text file (.csv, .tsv)."
            }
            LoadError::EmptySheet { .. } => {
                "Make sure the first worksheet has a header row followed by data, or re-export the workbook without macros."
            }
            LoadError::EmptyFile { .. } => {
                "Make sure the file has a header line followed by at least one data row."
            }
            LoadError::MalformedInput { .. } => {
                "Re-export the file from its source application, or pass --input-encoding if it is not UTF-8."
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            details: Some(self.remediation().to_string()),
        }
    }
}

/// Failure body mirroring the upload endpoint's `{error, details?}` shape.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
