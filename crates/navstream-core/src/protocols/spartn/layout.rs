pub const PREAMBLE: u8 = 0x73;

/// Preamble + 24-bit packed frame-start word.
pub const FRAME_START_LEN: usize = 4;

/// Payload descriptor length in bytes: 16-bit time tag vs 32-bit, plus
/// two extra bytes of encryption/authentication fields when encrypted.
pub const DESC_SHORT: usize = 4;
pub const DESC_LONG: usize = 6;
pub const DESC_ENCRYPTION_EXTRA: usize = 2;

/// Embedded authentication block sizes keyed by the 3-bit length field.
pub const AUTH_SIZES: [usize; 5] = [8, 12, 16, 32, 64];
