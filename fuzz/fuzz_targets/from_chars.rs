#![no_main]

use libfuzzer_sys::fuzz_target;

use fchars::{from_chars, CharsFormat, FromChars};

const FORMATS: [CharsFormat; 4] = [
    CharsFormat::General,
    CharsFormat::Scientific,
    CharsFormat::Fixed,
    CharsFormat::Hex,
];

fuzz_target!(|data: &[u8]| {
    // Raw bytes, never panics and never consumes past the end
    for format in FORMATS {
        if let Ok(parsed) = from_chars::<f64>(data, format) {
            assert!(parsed.consumed > 0 && parsed.consumed <= data.len());
        }
        if let Ok(parsed) = from_chars::<f32>(data, format) {
            assert!(parsed.consumed > 0 && parsed.consumed <= data.len());
        }
    }

    // Whole-string parsing agrees with std wherever std accepts the text
    let source = String::from_utf8_lossy(data);
    if let Ok(expected) = source.parse::<f64>() {
        if let Ok(value) = f64::from_chars(&source) {
            if !expected.is_nan() {
                assert_eq!(value.to_bits(), expected.to_bits(), "{source}");
            }
        }
    }
});
