#![no_main]
use libfuzzer_sys::fuzz_target;
use wwcodec::delta_apply;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let len = data[0] as usize * 4;
    let original: Vec<u8> = (0..len).map(|i| i as u8).collect();
    let mut buffer = original.clone();

    // A successful delta applied twice restores the buffer.
    if delta_apply(&data[1..], &mut buffer).is_ok() {
        delta_apply(&data[1..], &mut buffer).unwrap();
        assert_eq!(buffer, original);
    }
});
