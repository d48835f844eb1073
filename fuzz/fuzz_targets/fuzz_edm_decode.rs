#![no_main]

use libfuzzer_sys::fuzz_target;
use modkit_table::EdmType;

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid OOM on pathological inputs
    if data.len() > 1024 {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    for ty in EdmType::ALL {
        // Encoded text is a fixpoint of decode -> encode
        let Ok(value) = ty.decode(s) else {
            continue;
        };
        let Some(text) = ty.encode(&value) else {
            continue;
        };
        let again = ty.decode(&text).expect("encoded text must decode");
        assert_eq!(ty.encode(&again).as_deref(), Some(text.as_str()));
    }
});
