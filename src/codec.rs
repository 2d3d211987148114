//! Vector Codec
//!
//! Converts arbitrary text to and from a fixed-length normalized numeric
//! vector. This is the encoding the adaptation engine perturbs.
//!
//! The round trip is lossy by design: `decode` drops zero-valued bytes, so
//! `decode(encode(x)) == x` holds only for inputs with no embedded zero
//! byte and at most [`DATA_DIM`] bytes. This mirrors the persisted data
//! format and is documented rather than "fixed".

/// Fixed payload encoding dimension
pub const DATA_DIM: usize = 256;

/// Encode text as a normalized vector of length [`DATA_DIM`].
///
/// Byte `i` of the UTF-8 encoding maps to `byte/255` at index `i`. Indices
/// beyond the byte length remain 0. Bytes beyond the 256th are silently
/// truncated - documented, not an error.
pub fn encode(text: &str) -> Vec<f64> {
    let mut vector = vec![0.0; DATA_DIM];
    for (i, byte) in text.as_bytes().iter().take(DATA_DIM).enumerate() {
        vector[i] = f64::from(*byte) / 255.0;
    }
    vector
}

/// Decode a numeric vector back to text.
///
/// Each element maps to a byte via `round(|v|*255) mod 256`. Zero bytes are
/// dropped, then UTF-8 decoding is attempted. On decode failure the result
/// degrades to a lowercase-hex rendering of the byte sequence, so `decode`
/// never fails.
pub fn decode(vector: &[f64]) -> String {
    let bytes: Vec<u8> = vector
        .iter()
        .map(|v| ((v.abs() * 255.0).round() as u64 % 256) as u8)
        .filter(|b| *b > 0)
        .collect();

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err
            .into_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect(),
    }
}
