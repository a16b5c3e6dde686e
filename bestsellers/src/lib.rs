//! Bestsellers report pipeline.
//!
//! Parses a delimited sales export, accumulates quantity sold per product,
//! ranks the top sellers, and renders a static HTML report. The whole
//! pipeline is one synchronous pass with no ambient state: callers hand in
//! the source bytes and a [`ReportConfig`] and get the document back.

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod rank;
pub mod render;

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::debug;

pub use aggregate::{ProductTotal, SalesTotals};
pub use error::ReportError;
pub use loader::{OrderLine, OrderLines};
pub use rank::RankedEntry;
pub use render::render_html;

/// Knobs for one report invocation.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Number of products to rank, bounded by the distinct codes seen.
    pub top_k: usize,
    /// Character encoding of the source bytes. Defaults to windows-1252,
    /// which legacy spreadsheet exports use.
    pub encoding: &'static Encoding,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            encoding: WINDOWS_1252,
        }
    }
}

/// Run the whole pipeline: decode and parse `bytes`, aggregate per product,
/// rank the top sellers, and render the report document.
///
/// Any load failure aborts the invocation and no partial report is produced.
pub fn generate_report(bytes: &[u8], config: &ReportConfig) -> Result<String, ReportError> {
    let lines = OrderLines::from_bytes(bytes, config.encoding)?;
    let totals = SalesTotals::from_lines(lines)?;
    debug!(
        distinct_products = totals.distinct_products(),
        top_k = config.top_k,
        "aggregated sales input"
    );

    let ranked = rank::top(&totals, config.top_k);
    Ok(render::render_html(&ranked))
}
