//! Generic line protocol: a printable run (possibly empty) terminated by
//! CR LF, CR, or LF. Lowest-priority recognizer before the unknown
//! fallback, so anything line-shaped that no structured protocol claimed
//! still surfaces as readable text.

use crate::codec::SpecError;
use crate::message::{Direction, Message, Protocol};

use crate::protocols::common::{is_printable, printable_run};
use crate::protocols::{ProtocolHandler, Scan};

pub struct TextHandler;

impl ProtocolHandler for TextHandler {
    fn protocol(&self) -> Protocol {
        Protocol::Text
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        if !is_printable(buf[ofs]) && buf[ofs] != b'\r' && buf[ofs] != b'\n' {
            return Scan::NotFound;
        }
        let end_of_line = ofs + printable_run(buf, ofs);
        match buf.get(end_of_line) {
            Some(b'\r') => {
                if end_of_line + 1 == buf.len() {
                    // A LF may still be on its way.
                    Scan::Wait
                } else if buf[end_of_line + 1] == b'\n' {
                    Scan::Frame(end_of_line + 2)
                } else {
                    Scan::Frame(end_of_line + 1)
                }
            }
            Some(b'\n') => Scan::Frame(end_of_line + 1),
            Some(_) => Scan::NotFound,
            None => Scan::Wait,
        }
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        let mut msg = Message::new(Protocol::Text, Direction::Output, raw.to_vec());
        msg.name = "TEXT".to_string();
        Ok(msg)
    }
}

/// Wrap a line in CR LF (`direction = Input`).
pub fn make(line: &str) -> Message {
    let raw = format!("{line}\r\n").into_bytes();
    let mut msg = Message::new(Protocol::Text, Direction::Input, raw);
    msg.name = "TEXT".to_string();
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_with_crlf() {
        let raw = b"boot: firmware 2.01\r\nnext";
        assert_eq!(TextHandler.scan(raw, 0), Scan::Frame(21));
        let msg = TextHandler.process(&raw[..21]).unwrap();
        assert_eq!(msg.name, "TEXT");
        assert!(msg.fields.is_none());
    }

    #[test]
    fn bare_terminators_claim_an_empty_line() {
        assert_eq!(TextHandler.scan(b"\nrest", 0), Scan::Frame(1));
        assert_eq!(TextHandler.scan(b"\r\nrest", 0), Scan::Frame(2));
        assert_eq!(TextHandler.scan(b"\rX", 0), Scan::Frame(1));
    }

    #[test]
    fn unterminated_line_waits() {
        assert_eq!(TextHandler.scan(b"no newline yet", 0), Scan::Wait);
        assert_eq!(TextHandler.scan(b"line\r", 0), Scan::Wait);
    }

    #[test]
    fn binary_byte_is_not_text() {
        assert_eq!(TextHandler.scan(&[0xB5, 0x62], 0), Scan::NotFound);
        assert_eq!(TextHandler.scan(b"line\x00\n", 0), Scan::NotFound);
    }

    #[test]
    fn make_round_trips_through_scan() {
        let msg = make("hello");
        assert_eq!(TextHandler.scan(&msg.raw, 0), Scan::Frame(msg.raw.len()));
        assert_eq!(msg.direction, Direction::Input);
    }
}
