#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_score::scorer::{score, CheckFilter};

/// Fuzz the full detect, parse and score path.
///
/// Any document that parses must also score without panicking.
fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = sbom_score::parsers::parse_bytes(data) {
        let report = score(&doc, &CheckFilter::All);
        assert!(report.average_score.is_finite());
    }
});
