#![no_main]

use libfuzzer_sys::fuzz_target;

use fchars::{CharsFormat, FromChars, ToHexChars};

fuzz_target!(|data: (f64, f32)| {
    let (f64_val, f32_val) = data;

    // Hex output always parses back, bit-exactly for non-NaN values
    let hex = f64_val.to_hex_chars();
    let parsed = f64::from_chars_format(&hex, CharsFormat::Hex);
    assert!(parsed.is_ok(), "Failed to parse f64 hex output: {hex}");
    if let Ok(parsed) = parsed {
        assert_eq!(f64_val.is_nan(), parsed.is_nan());
        if !f64_val.is_nan() {
            assert_eq!(f64_val.to_bits(), parsed.to_bits(), "f64 roundtrip mismatch: {f64_val} -> {hex}");
        }
    }

    let hex = f32_val.to_hex_chars();
    let parsed = f32::from_chars_format(&hex, CharsFormat::Hex);
    assert!(parsed.is_ok(), "Failed to parse f32 hex output: {hex}");
    if let Ok(parsed) = parsed {
        assert_eq!(f32_val.is_nan(), parsed.is_nan());
        if !f32_val.is_nan() {
            assert_eq!(f32_val.to_bits(), parsed.to_bits(), "f32 roundtrip mismatch: {f32_val} -> {hex}");
        }
    }

    // Shortest decimal output from std reads back exactly
    if f64_val.is_finite() {
        let text = format!("{f64_val:e}");
        assert_eq!(f64::from_chars(&text).map(f64::to_bits), Ok(f64_val.to_bits()), "{text}");
    }
});
