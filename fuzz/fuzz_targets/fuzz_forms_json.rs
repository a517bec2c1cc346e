#![no_main]

use libfuzzer_sys::fuzz_target;

use formsmith::infrastructure::repositories::decode_forms;
use formsmith::{check_invariants, recompute, ValueMap};

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Stored JSON of any shape decodes to a list; recompute never panics
        for schema in decode_forms(raw) {
            if check_invariants(&schema).is_empty() {
                let _ = recompute(&schema, &ValueMap::new());
            }
        }
    }
});
