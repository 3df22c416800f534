//! Binary correction-data protocol (preamble `D3`).
//!
//! Frames carry a 10-bit payload length and a CRC-24Q trailer; the message
//! type is the payload's leading 12-bit bitfield, which doubles as the
//! registry identifier.

pub(crate) mod crc;
pub mod layout;
pub mod parser;
pub(crate) mod registry;

pub use parser::Rtcm3Handler;
