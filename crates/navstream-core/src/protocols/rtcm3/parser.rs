//! RTCM3 framing: `D3` preamble, 10-bit length, CRC-24Q over
//! header + payload.

use crate::codec::{self, SpecError};
use crate::message::{Direction, Message, Protocol};

use super::crc::crc24q;
use super::layout;
use super::registry;
use crate::protocols::{ProtocolHandler, Scan};

pub struct Rtcm3Handler;

impl ProtocolHandler for Rtcm3Handler {
    fn protocol(&self) -> Protocol {
        Protocol::Rtcm3
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        if buf[ofs] != layout::PREAMBLE {
            return Scan::NotFound;
        }
        if ofs + layout::HEADER_LEN > buf.len() {
            return Scan::Wait;
        }
        if buf[ofs + 1] & layout::RESERVED_MASK != 0 {
            return Scan::NotFound;
        }
        let len = ((usize::from(buf[ofs + 1]) & 0x03) << 8) | usize::from(buf[ofs + 2]);
        let end = ofs + layout::FRAME_OVERHEAD + len;
        if end > buf.len() {
            return Scan::Wait;
        }
        let crc = crc24q(&buf[ofs..end - layout::TRAILER_LEN]);
        let trailer = (u32::from(buf[end - 3]) << 16)
            | (u32::from(buf[end - 2]) << 8)
            | u32::from(buf[end - 1]);
        if crc != trailer {
            return Scan::NotFound;
        }
        Scan::Frame(end)
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        let payload = &raw[layout::HEADER_LEN..raw.len() - layout::TRAILER_LEN];
        let msg_type = message_type(payload);

        let mut msg = Message::new(Protocol::Rtcm3, Direction::Output, raw.to_vec());
        if let Some(msg_type) = msg_type {
            let id = msg_type.to_string();
            msg.id = Some(id.clone());
            msg.name = id;
            if let Some(entry) = registry::lookup(msg_type) {
                msg.description = Some(entry.descr.to_string());
                if let Some(spec) = entry.spec {
                    msg.fields = Some(codec::decode(payload, spec)?);
                }
            }
        }
        Ok(msg)
    }
}

/// Leading 12-bit big-endian message type, when the payload carries one.
fn message_type(payload: &[u8]) -> Option<u16> {
    if payload.len() < 2 {
        return None;
    }
    Some((u16::from(payload[0]) << 4) | (u16::from(payload[1]) >> 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FieldValue;

    /// Reference station ARP example frame from the RTCM 10403 text.
    pub(crate) const TYPE_1005: [u8; 25] = [
        0xD3, 0x00, 0x13, 0x3E, 0xD7, 0xD3, 0x02, 0x02, 0x98, 0x0E, 0xDE, 0xEF, 0x34, 0xB4, 0xBD,
        0x62, 0xAC, 0x09, 0x41, 0x98, 0x6F, 0x33, 0x36, 0x0B, 0x98,
    ];

    #[test]
    fn recognizes_published_1005_frame() {
        assert_eq!(Rtcm3Handler.scan(&TYPE_1005, 0), Scan::Frame(TYPE_1005.len()));
    }

    #[test]
    fn decodes_1005_station_fields() {
        let msg = Rtcm3Handler.process(&TYPE_1005).unwrap();
        assert_eq!(msg.id.as_deref(), Some("1005"));
        assert_eq!(
            msg.description.as_deref(),
            Some("Stationary RTK reference station ARP")
        );
        let fields = msg.fields.unwrap();
        assert_eq!(fields.get("type"), Some(&FieldValue::U64(1005)));
        // The ECEF coordinates are plausible earth-surface magnitudes.
        let FieldValue::F64(x) = fields.get("ecefX").unwrap() else {
            panic!("expected f64");
        };
        assert!(x.abs() > 1e6 && x.abs() < 1e7);
    }

    #[test]
    fn corrupted_payload_is_not_found() {
        let mut corrupted = TYPE_1005;
        corrupted[10] ^= 0x20;
        assert_eq!(Rtcm3Handler.scan(&corrupted, 0), Scan::NotFound);
    }

    #[test]
    fn nonzero_reserved_bits_are_rejected() {
        let mut frame = TYPE_1005;
        frame[1] |= 0x40;
        assert_eq!(Rtcm3Handler.scan(&frame, 0), Scan::NotFound);
    }

    #[test]
    fn partial_frame_waits() {
        assert_eq!(Rtcm3Handler.scan(&TYPE_1005[..2], 0), Scan::Wait);
        assert_eq!(Rtcm3Handler.scan(&TYPE_1005[..24], 0), Scan::Wait);
    }

    #[test]
    fn decodes_1033_descriptor_strings() {
        // type 1033, staId 291, then length-prefixed descriptor strings.
        let mut payload = vec![0x40, 0x91, 0x23];
        payload.push(4);
        payload.extend_from_slice(b"ADVN");
        payload.push(0); // antSetupId
        payload.push(3);
        payload.extend_from_slice(b"123");
        payload.push(5);
        payload.extend_from_slice(b"RCV-X");
        payload.push(3);
        payload.extend_from_slice(b"1.2");
        payload.push(2);
        payload.extend_from_slice(b"77");
        let mut frame = vec![0xD3, 0x00, payload.len() as u8];
        frame.extend_from_slice(&payload);
        let crc = super::crc24q(&frame);
        frame.extend_from_slice(&crc.to_be_bytes()[1..]);

        assert_eq!(Rtcm3Handler.scan(&frame, 0), Scan::Frame(frame.len()));
        let msg = Rtcm3Handler.process(&frame).unwrap();
        assert_eq!(msg.id.as_deref(), Some("1033"));
        let fields = msg.fields.unwrap();
        assert_eq!(fields.get("staId"), Some(&FieldValue::U64(291)));
        assert_eq!(fields.get("antDescr"), Some(&FieldValue::Str("ADVN".to_string())));
        assert_eq!(fields.get("rcvType"), Some(&FieldValue::Str("RCV-X".to_string())));
        assert_eq!(fields.get("rcvSerial"), Some(&FieldValue::Str("77".to_string())));
    }

    #[test]
    fn unknown_type_still_resolves_identifier() {
        // 10-byte payload with type 4000, framed with a valid CRC.
        let mut payload = vec![0u8; 10];
        payload[0] = 0xFA;
        payload[1] = 0x00;
        let mut frame = vec![0xD3, 0x00, payload.len() as u8];
        frame.extend_from_slice(&payload);
        let crc = super::crc24q(&frame);
        frame.extend_from_slice(&crc.to_be_bytes()[1..]);

        assert_eq!(Rtcm3Handler.scan(&frame, 0), Scan::Frame(frame.len()));
        let msg = Rtcm3Handler.process(&frame).unwrap();
        assert_eq!(msg.id.as_deref(), Some("4000"));
        assert!(msg.description.is_none());
        assert!(msg.fields.is_none());
    }
}
