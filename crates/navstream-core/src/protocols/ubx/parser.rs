//! UBX framing: sync pair, class/id, little-endian length, payload and a
//! two-byte running-sum checksum over class..payload.

use crate::codec::{self, SpecError};
use crate::message::{Direction, FieldMap, Message, Protocol};

use super::layout;
use super::registry;
use crate::protocols::{ProtocolHandler, Scan};

/// Running-sum checksum (`ck_a += byte; ck_b += ck_a`, wrapping).
pub(crate) fn checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;
    for byte in data {
        ck_a = ck_a.wrapping_add(*byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    (ck_a, ck_b)
}

pub struct UbxHandler;

impl ProtocolHandler for UbxHandler {
    fn protocol(&self) -> Protocol {
        Protocol::Ubx
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        if buf[ofs] != layout::SYNC_1 {
            return Scan::NotFound;
        }
        if ofs + 2 > buf.len() {
            return Scan::Wait;
        }
        if buf[ofs + 1] != layout::SYNC_2 {
            return Scan::NotFound;
        }
        if ofs + layout::HEADER_LEN > buf.len() {
            return Scan::Wait;
        }
        let len = u16::from_le_bytes([
            buf[ofs + layout::LEN_RANGE.start],
            buf[ofs + layout::LEN_RANGE.start + 1],
        ]) as usize;
        let end = ofs + layout::FRAME_OVERHEAD + len;
        if end > buf.len() {
            return Scan::Wait;
        }
        let (ck_a, ck_b) = checksum(&buf[ofs + layout::CLASS_OFFSET..end - layout::TRAILER_LEN]);
        if ck_a != buf[end - 2] || ck_b != buf[end - 1] {
            return Scan::NotFound;
        }
        Scan::Frame(end)
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        let class = raw[layout::CLASS_OFFSET];
        let id = raw[layout::ID_OFFSET];
        let payload = &raw[layout::PAYLOAD_OFFSET..raw.len() - layout::TRAILER_LEN];

        let mut msg = Message::new(Protocol::Ubx, Direction::Output, raw.to_vec());
        match registry::lookup(class, id) {
            Some(entry) => {
                msg.id = Some(entry.name.to_string());
                msg.name = entry.name.to_string();
                msg.description = Some(entry.descr.to_string());
                if let Some(spec) = entry.spec {
                    if !payload.is_empty() {
                        msg.fields = Some(codec::decode(payload, spec)?);
                    }
                }
            }
            None => {
                let name = fallback_name(class, id);
                msg.id = Some(name.clone());
                msg.name = name;
            }
        }
        Ok(msg)
    }
}

fn fallback_name(class: u8, id: u8) -> String {
    match registry::class_name(class) {
        Some(class_name) => format!("{class_name}-{id:02X}"),
        None => format!("UBX-{class:02X}-{id:02X}"),
    }
}

/// Wrap a payload in a ready-to-send frame (`direction = Input`).
pub fn make_frame(class: u8, id: u8, payload: &[u8]) -> Message {
    let mut raw = Vec::with_capacity(payload.len() + layout::FRAME_OVERHEAD);
    raw.push(layout::SYNC_1);
    raw.push(layout::SYNC_2);
    raw.push(class);
    raw.push(id);
    raw.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    raw.extend_from_slice(payload);
    let (ck_a, ck_b) = checksum(&raw[layout::CLASS_OFFSET..]);
    raw.push(ck_a);
    raw.push(ck_b);

    let mut msg = Message::new(Protocol::Ubx, Direction::Input, raw);
    let name = registry::lookup(class, id)
        .map(|entry| entry.name.to_string())
        .unwrap_or_else(|| fallback_name(class, id));
    msg.id = Some(name.clone());
    msg.name = name;
    msg
}

/// Encode a field mapping via the registry layout and wrap it. An empty
/// mapping produces a poll frame (zero-length payload).
pub fn make(name: &str, fields: &FieldMap) -> Result<Message, SpecError> {
    let entry = registry::lookup_name(name)
        .ok_or_else(|| SpecError::UnknownType(format!("UBX message `{name}`")))?;
    let payload = match entry.spec {
        Some(spec) if !fields.is_empty() => codec::encode(fields, spec)?,
        _ => Vec::new(),
    };
    Ok(make_frame(entry.class, entry.id, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FieldValue;

    fn nav_pvt_frame() -> Vec<u8> {
        let mut fields = FieldMap::new();
        fields.insert("iTOW", FieldValue::U64(123_456));
        fields.insert("numSV", FieldValue::U64(9));
        fields.insert("lon", FieldValue::F64(11.5167));
        fields.insert("lat", FieldValue::F64(48.1173));
        make("NAV-PVT", &fields).unwrap().raw
    }

    #[test]
    fn recognizes_and_decodes_nav_pvt() {
        let frame = nav_pvt_frame();
        assert_eq!(UbxHandler.scan(&frame, 0), Scan::Frame(frame.len()));

        let msg = UbxHandler.process(&frame).unwrap();
        assert_eq!(msg.id.as_deref(), Some("NAV-PVT"));
        assert_eq!(msg.description.as_deref(), Some("Navigation position velocity time solution"));
        let fields = msg.fields.unwrap();
        assert_eq!(fields.get("iTOW"), Some(&FieldValue::U64(123_456)));
        assert_eq!(fields.get("numSV"), Some(&FieldValue::U64(9)));
        let FieldValue::F64(lat) = fields.get("lat").unwrap() else {
            panic!("expected f64 lat");
        };
        assert!((lat - 48.1173).abs() < 1e-6);
    }

    #[test]
    fn corrupted_checksum_is_not_found() {
        let mut frame = nav_pvt_frame();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert_eq!(UbxHandler.scan(&frame, 0), Scan::NotFound);
    }

    #[test]
    fn truncated_frame_waits() {
        let frame = nav_pvt_frame();
        for cut in [1, 3, 5, frame.len() - 1] {
            assert_eq!(UbxHandler.scan(&frame[..cut], 0), Scan::Wait, "cut {cut}");
        }
    }

    #[test]
    fn wrong_sync_is_not_found() {
        assert_eq!(UbxHandler.scan(&[0x00, 0x62], 0), Scan::NotFound);
        assert_eq!(UbxHandler.scan(&[0xB5, 0x00], 0), Scan::NotFound);
    }

    #[test]
    fn nav_svinfo_decodes_channel_blocks() {
        // iTOW 1000, numCh 2, globalFlags, 2 reserved bytes, then two
        // 12-byte channel blocks.
        let mut payload = vec![0xE8, 0x03, 0x00, 0x00, 2, 0x04, 0, 0];
        payload.extend_from_slice(&[0, 5, 0x0D, 0x04, 45, 60, 0x2C, 0x01, 10, 0, 0, 0]);
        payload.extend_from_slice(&[1, 17, 0x0D, 0x07, 50, 30, 0x90, 0x00, 0xF6, 0xFF, 0xFF, 0xFF]);
        let frame = make_frame(0x01, 0x30, &payload);

        let msg = UbxHandler.process(&frame.raw).unwrap();
        assert_eq!(msg.id.as_deref(), Some("NAV-SVINFO"));
        let fields = msg.fields.unwrap();
        let FieldValue::List(channels) = fields.get("channels").unwrap() else {
            panic!("expected channel list");
        };
        assert_eq!(channels.len(), 2);
        let FieldValue::Map(first) = &channels[0] else {
            panic!("expected channel map");
        };
        assert_eq!(first.get("svid"), Some(&FieldValue::U64(5)));
        assert_eq!(first.get("azim"), Some(&FieldValue::I64(300)));
        let FieldValue::Map(second) = &channels[1] else {
            panic!("expected channel map");
        };
        assert_eq!(second.get("prRes"), Some(&FieldValue::I64(-10)));
    }

    #[test]
    fn unknown_class_id_gets_hex_identifier() {
        let frame = make_frame(0x01, 0x7F, &[]);
        let msg = UbxHandler.process(&frame.raw).unwrap();
        assert_eq!(msg.id.as_deref(), Some("NAV-7F"));
        let frame = make_frame(0xEE, 0x01, &[1, 2]);
        let msg = UbxHandler.process(&frame.raw).unwrap();
        assert_eq!(msg.id.as_deref(), Some("UBX-EE-01"));
    }

    #[test]
    fn poll_frame_has_empty_payload_and_valid_checksum() {
        let msg = make("MON-VER", &FieldMap::new()).unwrap();
        assert_eq!(msg.raw.len(), layout::FRAME_OVERHEAD);
        assert_eq!(msg.direction, Direction::Input);
        assert_eq!(UbxHandler.scan(&msg.raw, 0), Scan::Frame(msg.raw.len()));
    }

    #[test]
    fn ack_round_trip_through_encode() {
        let mut fields = FieldMap::new();
        fields.insert("clsID", FieldValue::U64(0x06));
        fields.insert("msgID", FieldValue::U64(0x01));
        let msg = make("ACK-ACK", &fields).unwrap();
        let back = UbxHandler.process(&msg.raw).unwrap();
        assert_eq!(back.fields.unwrap(), fields);
    }
}
