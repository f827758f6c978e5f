#![no_main]

use cypherscope_core::EditorSupport;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let support = EditorSupport::new(text);
        let _ = support.errors();
        let _ = support.statements();
        let _ = support.highlight();

        // Probe the position-indexed queries at the document start and past
        // the document end (coordinates clamp).
        for (line, column) in [(1, 1), (u32::MAX, u32::MAX)] {
            let _ = support.element_at(line, column);
            let _ = support.references_at(line, column);
            let _ = support.complete(line, column, ":");
        }
    }
});
