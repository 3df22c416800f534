//! Binary receiver-control protocol (sync `B5 62`).
//!
//! The recognizer validates sync/length/checksum; the processor resolves
//! the class/id pair against the registry and decodes the payload with the
//! matching layout. The constructor encodes a field mapping back into a
//! ready-to-send frame, which is how outbound poll and configuration
//! messages are built.

pub mod layout;
pub mod parser;
pub(crate) mod registry;

pub use parser::{UbxHandler, make, make_frame};
