//! Binary correction-stream transport (preamble `73`).
//!
//! Payloads are encrypted, so decoding stops at the frame header: a 24-bit
//! frame-start word guarded by a CRC-4, a payload descriptor of variable
//! width and a body CRC of 1..4 bytes. The header fields alone are enough
//! to track a correction stream (type, subtype, time tag, solution ids).

pub(crate) mod crc;
pub mod layout;
pub mod parser;
pub(crate) mod registry;

pub use parser::SpartnHandler;
