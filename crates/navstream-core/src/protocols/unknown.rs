//! Fallback for bytes no recognizer claimed. There is no recognizer
//! here: the engine coalesces unclaimed spans itself and only needs the
//! message constructors.

use crate::message::{Direction, Message, Protocol};

/// Coalesced unclaimed bytes, cut out of the stream.
pub(crate) fn claimed(raw: Vec<u8>) -> Message {
    let mut msg = Message::new(Protocol::Unknown, Direction::Output, raw);
    msg.name = "UNKNOWN".to_string();
    msg
}

/// Diagnostic view of a buffered tail that has not been consumed.
pub(crate) fn pending(raw: Vec<u8>) -> Message {
    let mut msg = Message::new(Protocol::Unknown, Direction::Pending, raw);
    msg.name = "UNKNOWN".to_string();
    msg
}
