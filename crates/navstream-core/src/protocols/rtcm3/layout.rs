pub const PREAMBLE: u8 = 0xD3;

/// Preamble + 6 reserved bits + 10-bit length.
pub const HEADER_LEN: usize = 3;
/// CRC-24Q trailer.
pub const TRAILER_LEN: usize = 3;
pub const FRAME_OVERHEAD: usize = HEADER_LEN + TRAILER_LEN;

/// High 6 bits of the second header byte must be zero.
pub const RESERVED_MASK: u8 = 0xFC;
