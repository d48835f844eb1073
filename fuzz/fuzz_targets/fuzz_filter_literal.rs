#![no_main]

use libfuzzer_sys::fuzz_target;
use modkit_table::filter::{apply_eq, apply_property_name, serialize};
use modkit_table::{EdmType, Filter};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        for edm_type in [EdmType::String, EdmType::Guid, EdmType::Int64] {
            let constant = Filter::Constant {
                edm_type,
                value: s.into(),
            };
            let rendered = serialize(&apply_eq(apply_property_name("P"), constant));
            // quotes inside literals are doubled, so the total stays even
            assert_eq!(rendered.matches('\'').count() % 2, 0);
        }
    }
});
