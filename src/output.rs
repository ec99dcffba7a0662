//! Result types returned by the conversion entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a successful file conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The path the PDF was written to. Identical to the explicit output
    /// path when one was given.
    pub output_path: PathBuf,
    pub stats: ConversionStats,
}

/// Statistics for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the produced PDF.
    pub page_count: usize,
    /// Bookmarks in the PDF outline.
    pub outline_entries: usize,
    /// Size of the Markdown after normalisation.
    pub input_bytes: usize,
    /// Size of the PDF.
    pub output_bytes: usize,
    /// Wall-clock time spent rendering.
    pub render_duration_ms: u64,
    /// Wall-clock time for the whole conversion, including I/O.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_with_field_names() {
        let stats = ConversionStats {
            page_count: 2,
            outline_entries: 3,
            input_bytes: 100,
            output_bytes: 2048,
            render_duration_ms: 5,
            total_duration_ms: 7,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["page_count"], 2);
        assert_eq!(json["outline_entries"], 3);
        assert_eq!(json["output_bytes"], 2048);
    }
}
