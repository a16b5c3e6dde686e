use thiserror::Error;

/// Errors that abort a report invocation.
///
/// The pipeline performs no local recovery: the first error stops the run and
/// no partial report is produced. Callers decide how to surface the failure.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required column is absent from the header row. Detected before any
    /// data row is read.
    #[error("required column `{0}` missing from header")]
    MissingColumn(&'static str),

    /// A row's quantity field does not parse as a signed integer.
    #[error("line {line}: quantity `{value}` is not an integer")]
    InvalidQuantity { line: u64, value: String },

    /// The source bytes are malformed under the configured encoding.
    #[error("input is not valid {encoding}")]
    Encoding { encoding: &'static str },

    /// A structurally malformed row (wrong field count, bad quoting). Rows
    /// are never skipped, so a single bad row fails the whole load.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
