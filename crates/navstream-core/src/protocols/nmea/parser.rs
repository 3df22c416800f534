//! NMEA sentence framing: `$` body `*hh` CR LF with an XOR checksum over
//! every byte between `$` and `*`.

use crate::codec::{self, SpecError};
use crate::message::{Direction, Message, Protocol};

use super::layout;
use super::registry;
use crate::protocols::common::is_printable;
use crate::protocols::{ProtocolHandler, Scan};

pub(crate) fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, byte| acc ^ byte)
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

pub struct NmeaHandler;

impl ProtocolHandler for NmeaHandler {
    fn protocol(&self) -> Protocol {
        Protocol::Nmea
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        if buf[ofs] != layout::START {
            return Scan::NotFound;
        }

        let mut star = None;
        for i in ofs + 1..buf.len() {
            if buf[i] == layout::CHECKSUM_MARK {
                star = Some(i);
                break;
            }
            if !is_printable(buf[i]) {
                return Scan::NotFound;
            }
            if i - ofs > layout::MAX_BODY_LEN {
                return Scan::NotFound;
            }
        }
        let Some(star) = star else {
            if buf.len() - ofs > layout::MAX_BODY_LEN {
                return Scan::NotFound;
            }
            return Scan::Wait;
        };

        let end = star + layout::TRAILER_LEN;
        if end > buf.len() {
            return Scan::Wait;
        }
        let (Some(hi), Some(lo)) = (hex_digit(buf[star + 1]), hex_digit(buf[star + 2])) else {
            return Scan::NotFound;
        };
        if buf[star + 3] != b'\r' || buf[star + 4] != b'\n' {
            return Scan::NotFound;
        }
        if checksum(&buf[ofs + 1..star]) != (hi << 4 | lo) {
            return Scan::NotFound;
        }
        Scan::Frame(end)
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        // The recognizer validated `$ body *hh \r\n`.
        let body = &raw[1..raw.len() - layout::TRAILER_LEN];
        let address_end = body
            .iter()
            .position(|b| *b == b',')
            .unwrap_or(body.len());
        let address = String::from_utf8_lossy(&body[..address_end]).into_owned();
        let id = sentence_id(&address);

        let mut msg = Message::new(Protocol::Nmea, Direction::Output, raw.to_vec());
        msg.id = Some(id.clone());
        msg.name = id.clone();
        if let Some(entry) = registry::lookup(&id) {
            msg.description = Some(entry.descr.to_string());
            if let Some(spec) = entry.spec {
                if address_end < body.len() {
                    msg.fields = Some(codec::decode(&body[address_end + 1..], spec)?);
                }
            }
        }
        Ok(msg)
    }
}

/// Strip the talker prefix (`GPGGA` -> `GGA`); proprietary sentences keep
/// their full address (`PUBX`).
fn sentence_id(address: &str) -> String {
    if address.starts_with('P') {
        address.to_string()
    } else if address.len() >= 5 {
        address[2..].to_string()
    } else {
        address.to_string()
    }
}

/// Wrap a sentence body in `$...*hh\r\n` (`direction = Input`).
pub fn make(body: &str) -> Message {
    let cs = checksum(body.as_bytes());
    let raw = format!("${body}*{cs:02X}\r\n").into_bytes();
    let mut msg = Message::new(Protocol::Nmea, Direction::Input, raw);
    let address_end = body.find(',').unwrap_or(body.len());
    let id = sentence_id(&body[..address_end]);
    msg.id = Some(id.clone());
    msg.name = id;
    msg
}
