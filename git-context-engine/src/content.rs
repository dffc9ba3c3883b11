//! Classification of raw file bytes into text or "unavailable".

/// Turns raw repository bytes into text, or `None` when the content is
/// considered binary.
///
/// Binary detection is a heuristic: any NUL byte marks the file as binary.
/// It misclassifies UTF-16 text and accepts some binary formats without NULs;
/// that approximation is intentional.
///
/// Decoding tries UTF-8 first and falls back to Latin-1, which maps every
/// byte to the code point of the same value and therefore never fails. The
/// order matters: valid UTF-8 must never be reinterpreted as Latin-1.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    if looks_binary(bytes) {
        return None;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_owned()),
        Err(_) => Some(decode_latin1(bytes)),
    }
}

/// NUL-byte heuristic.
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
