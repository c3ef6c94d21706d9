#![no_main]

use libfuzzer_sys::fuzz_target;
use rowgate_core::PagingState;

fuzz_target!(|data: &[u8]| {
    // Engine-issued bytes survive the text transport unchanged
    let state = PagingState::from_bytes(data.to_vec());
    let decoded = PagingState::from_base64(&state.to_base64());
    assert_eq!(decoded.ok().as_ref(), Some(&state));

    // Client-supplied text must never panic
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = PagingState::from_base64(text);
    }
});
