pub const SYNC_1: u8 = 0xB5;
pub const SYNC_2: u8 = 0x62;

pub const CLASS_OFFSET: usize = 2;
pub const ID_OFFSET: usize = 3;
pub const LEN_RANGE: std::ops::Range<usize> = 4..6;
pub const PAYLOAD_OFFSET: usize = 6;

/// Sync + class + id + length.
pub const HEADER_LEN: usize = 6;
/// Two running-sum checksum bytes.
pub const TRAILER_LEN: usize = 2;
/// Header + trailer around the payload.
pub const FRAME_OVERHEAD: usize = HEADER_LEN + TRAILER_LEN;
