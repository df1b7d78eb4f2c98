//! The single byte inversion applied to packed payloads.
//!
//! Engines reading PackOnly archives expect every non-image payload to have the byte at
//! [`OBFUSCATED_BYTE`] inverted. `.png` files and payloads too short to contain that
//! byte are stored untouched.

/// Position within a file's data block of the inverted byte.
pub const OBFUSCATED_BYTE: usize = 0x1A;

const IMAGE_SUFFIX: &[u8] = b".png";

/// Whether `name` ends in `.png`, ignoring ASCII case.
pub fn is_image_name(name: &str) -> bool {
    let name = name.as_bytes();
    name.len() >= IMAGE_SUFFIX.len()
        && name[name.len() - IMAGE_SUFFIX.len()..].eq_ignore_ascii_case(IMAGE_SUFFIX)
}

pub fn should_obfuscate(name: &str, len: usize) -> bool {
    !is_image_name(name) && len > OBFUSCATED_BYTE
}

/// Inverts the marker byte of `data` in place if the rule applies to `name`, returning
/// whether it did. Applying it twice restores the original bytes.
pub fn obfuscate(name: &str, data: &mut [u8]) -> bool {
    if !should_obfuscate(name, data.len()) {
        return false;
    }
    data[OBFUSCATED_BYTE] ^= 0xFF;
    true
}
