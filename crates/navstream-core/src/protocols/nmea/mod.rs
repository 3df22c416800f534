//! Text sentence protocol (`$...*hh`).
//!
//! Sentences are validated end to end (printable body, upper-hex XOR
//! checksum, CR LF) before the processor touches them; the identifier is
//! the sentence id with the talker stripped, so `GPGGA` and `GNGGA`
//! resolve to the same registry entry.

pub mod layout;
pub mod parser;
pub(crate) mod registry;

pub use parser::{NmeaHandler, make};
