//! Little-endian field access for the fixed size records.

#[inline]
pub fn le_u32(bytes: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*bytes)
}

/// Copies a field out of a record. `bytes` must be exactly `N` long, which the callers
/// guarantee by slicing at fixed offsets.
#[inline]
pub fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0; N];
    array.copy_from_slice(bytes);
    array
}
