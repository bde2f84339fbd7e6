//! Error types shared by the deck workspace.
//!
//! Slide composition itself never fails; these errors describe what went
//! wrong inside a collaborator (ingestion, image source, enrichment service)
//! so the caller can log it before falling back.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by deck collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The input table could not be parsed.
    #[error("CSV parsing error: {0}")]
    CsvError(String),

    /// A spreadsheet workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// The input file type is not a supported table format.
    #[error("Invalid file format: {0}")]
    UnsupportedFormat(String),

    /// An image reference was empty or whitespace.
    #[error("Image reference is blank")]
    BlankImageReference,

    /// Fetching a remote image failed.
    #[error("Failed to fetch image: {0}")]
    ImageFetch(String),

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// No enrichment service is configured.
    #[error("Enrichment service unavailable")]
    EnrichmentUnavailable,

    /// The enrichment service returned an error or an unusable response.
    #[error("Enrichment failed: {0}")]
    EnrichmentFailed(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),
}
