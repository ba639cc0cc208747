use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Tolerance
///
/// The fingerprints are used to recognise the same chunk coming back from two retrievers
/// within one query. A collision merges two fused entries into one; it never corrupts the
/// on-disk index, which keys records by random ids.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Identity of a chunk: its source url plus its text.
#[inline]
pub fn chunk_fingerprint(url: &str, content: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(url.as_bytes());
    hasher.update(b"|");
    hasher.update(content.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Stable 64-bit seed for a token, used by the hashed stub vectors.
#[inline]
pub fn hash_token(token: &str) -> u64 {
    hash_to_u64(token.as_bytes())
}
