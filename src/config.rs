/// Authenticator AAGUID embedded in every attested-credential block.
/// 90da3615-8c79-4d33-814a-686c9045d7ae - dummy, replace before production use.
pub const AAGUID: [u8; 16] = [
    0x90, 0xda, 0x36, 0x15, 0x8c, 0x79, 0x4d, 0x33, 0x81, 0x4a, 0x68, 0x6c, 0x90, 0x45, 0xd7, 0xae,
];

/// COSE algorithm identifier for ES256 (ECDSA w/ SHA-256), the only
/// algorithm this authenticator supports.
pub const COSE_ALG_ES256: i64 = -7;
