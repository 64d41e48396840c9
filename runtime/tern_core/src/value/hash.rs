//! Content hashing for hashable values.

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a over a byte string. Strings cache this at construction.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Integer mix for the bit pattern of a primitive (Thomas Wang's 64-bit hash).
#[allow(
    clippy::cast_possible_truncation,
    reason = "masked to 30 bits before narrowing"
)]
pub fn hash_bits(bits: u64) -> u32 {
    let mut hash = bits;
    hash = (!hash).wrapping_add(hash << 18);
    hash ^= hash >> 31;
    hash = hash.wrapping_mul(21);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 6);
    hash ^= hash >> 22;
    (hash & 0x3fff_ffff) as u32
}
