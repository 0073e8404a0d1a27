#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the advisory parsing entry point.
///
/// Feeds arbitrary UTF-8 strings to `parse_document_str` and, when a document
/// comes out, walks both resolved sequences so the product tree resolver runs
/// on whatever shape the input produced.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = cvrf_tools::parsers::parse_document_str(s) {
            let _ = doc.product_tree.products();
            let _ = doc.product_tree.branches();
            let _ = doc.product_tree.duplicate_product_ids();
        }
    }
});
