#![no_main]
use fossil_delta::{DecodeOptions, apply_delta, apply_delta_with_options, delta_target_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic, only return errors.
    let _ = apply_delta(&[], data);

    // Also fuzz with a non-empty source.
    if data.len() >= 2 {
        let split = data.len() / 2;
        let (source, delta) = data.split_at(split);
        let no_verify = DecodeOptions {
            verify_checksum: false,
        };
        if let Ok(out) = apply_delta_with_options(source, delta, &no_verify) {
            assert_eq!(Ok(out.len()), delta_target_size(delta));
        }
    }
});
