#![no_main]
use fossil_delta::{EncodeOptions, apply_delta, create_delta_with_options, delta_target_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the chain limit, second the source/target split.
    let chain_limit = data[0] as usize * 2;
    let payload = &data[2..];
    let split = if payload.is_empty() {
        0
    } else {
        data[1] as usize % (payload.len() + 1)
    };
    let (source, target) = payload.split_at(split);

    let delta = create_delta_with_options(source, target, &EncodeOptions { chain_limit });
    assert_eq!(delta_target_size(&delta), Ok(target.len()));

    let decoded = apply_delta(source, &delta).unwrap();
    assert_eq!(decoded, target);
});
