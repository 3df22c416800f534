pub const START: u8 = b'$';
pub const CHECKSUM_MARK: u8 = b'*';

/// `*hh` followed by CR LF.
pub const TRAILER_LEN: usize = 5;

/// Candidate sentences longer than this are rejected so a stray `$`
/// inside plain text cannot stall the scanner.
pub const MAX_BODY_LEN: usize = 100;
