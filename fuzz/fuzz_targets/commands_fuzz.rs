#![no_main]
use fossil_delta::{Command, Commands, DecodeOptions, apply_delta_with_options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // A delta the decoder accepts must also parse cleanly as a command
    // stream, and its commands must account for the whole target.
    let split = data.first().map_or(0, |&b| b as usize).min(data.len());
    let (source, delta) = data.split_at(split);
    let opts = DecodeOptions {
        verify_checksum: false,
    };
    let Ok(out) = apply_delta_with_options(source, delta, &opts) else {
        return;
    };

    let mut total = 0u64;
    let mut saw_checksum = false;
    for cmd in Commands::new(delta).unwrap() {
        match cmd.unwrap() {
            Command::Insert(bytes) => total += bytes.len() as u64,
            Command::Copy { len, .. } => total += len,
            Command::Checksum(_) => saw_checksum = true,
        }
    }
    assert!(saw_checksum);
    assert_eq!(total, out.len() as u64);
});
