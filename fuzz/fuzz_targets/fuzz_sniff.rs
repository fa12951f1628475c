#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz content sniffing without parsing.
fuzz_target!(|data: &[u8]| {
    let _ = sbom_score::parsers::detect(data);
});
