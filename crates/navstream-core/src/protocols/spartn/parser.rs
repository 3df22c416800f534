//! SPARTN transport framing: preamble, a 24-bit frame-start word guarded
//! by a 4-bit CRC, a variable-width payload descriptor, an encrypted
//! payload and a body CRC of 1..4 bytes.

use crate::codec::SpecError;
use crate::message::{Direction, FieldMap, FieldValue, Message, Protocol};

use super::{crc, layout, registry};
use crate::protocols::{ProtocolHandler, Scan};

/// Decoded frame-start word and payload descriptor.
struct Header {
    msg_type: u8,
    subtype: u8,
    payload_len: usize,
    encrypted: bool,
    crc_type: u8,
    time_tag_type: bool,
    gnss_time_tag: u64,
    solution_id: u8,
    solution_proc_id: u8,
    encryption_id: u8,
    encryption_seq: u8,
    auth_ind: u8,
    embedded_auth_len: u8,
}

impl Header {
    fn desc_len(&self) -> usize {
        let base = if self.time_tag_type {
            layout::DESC_LONG
        } else {
            layout::DESC_SHORT
        };
        if self.encrypted {
            base + layout::DESC_ENCRYPTION_EXTRA
        } else {
            base
        }
    }

    /// Embedded authentication block size; `parse_header` has already
    /// rejected out-of-range length codes.
    fn auth_len(&self) -> usize {
        if self.encrypted && self.auth_ind > 1 {
            layout::AUTH_SIZES
                .get(usize::from(self.embedded_auth_len))
                .copied()
                .unwrap_or(0)
        } else {
            0
        }
    }

    fn crc_len(&self) -> usize {
        crc::crc_len(self.crc_type)
    }

    fn frame_len(&self) -> usize {
        layout::FRAME_START_LEN + self.desc_len() + self.payload_len + self.auth_len() + self.crc_len()
    }
}

enum HeaderScan {
    Wait,
    Invalid,
    Ok(Header),
}

/// Big-endian bit reader over a descriptor of at most eight bytes.
struct DescBits {
    word: u64,
    left: usize,
}

impl DescBits {
    fn new(bytes: &[u8]) -> Self {
        let mut word = 0u64;
        for byte in bytes {
            word = (word << 8) | u64::from(*byte);
        }
        word <<= 64 - bytes.len() * 8;
        DescBits {
            word,
            left: bytes.len() * 8,
        }
    }

    fn take(&mut self, bits: usize) -> u64 {
        debug_assert!(bits <= self.left);
        let value = self.word >> (64 - bits);
        self.word <<= bits;
        self.left -= bits;
        value
    }
}

fn parse_header(buf: &[u8], ofs: usize) -> HeaderScan {
    if ofs + layout::FRAME_START_LEN > buf.len() {
        return HeaderScan::Wait;
    }
    let word = (u32::from(buf[ofs + 1]) << 16) | (u32::from(buf[ofs + 2]) << 8) | u32::from(buf[ofs + 3]);
    let frame_crc = (word & 0x0F) as u8;
    if crc::crc4_bits(word >> 4, 20) != frame_crc {
        return HeaderScan::Invalid;
    }
    let msg_type = (word >> 17) as u8;
    let payload_len = ((word >> 7) & 0x3FF) as usize;
    let encrypted = (word >> 6) & 1 != 0;
    let crc_type = ((word >> 4) & 0x3) as u8;

    // The time-tag width flag sits in the first descriptor byte.
    if ofs + layout::FRAME_START_LEN + 1 > buf.len() {
        return HeaderScan::Wait;
    }
    let time_tag_type = buf[ofs + layout::FRAME_START_LEN] & 0x08 != 0;
    let mut desc_len = if time_tag_type {
        layout::DESC_LONG
    } else {
        layout::DESC_SHORT
    };
    if encrypted {
        desc_len += layout::DESC_ENCRYPTION_EXTRA;
    }
    if ofs + layout::FRAME_START_LEN + desc_len > buf.len() {
        return HeaderScan::Wait;
    }

    let desc = &buf[ofs + layout::FRAME_START_LEN..ofs + layout::FRAME_START_LEN + desc_len];
    let mut bits = DescBits::new(desc);
    let subtype = bits.take(4) as u8;
    let _ = bits.take(1); // time-tag width, read above
    let gnss_time_tag = bits.take(if time_tag_type { 32 } else { 16 });
    let solution_id = bits.take(7) as u8;
    let solution_proc_id = bits.take(4) as u8;
    let (encryption_id, encryption_seq, auth_ind, embedded_auth_len) = if encrypted {
        (
            bits.take(4) as u8,
            bits.take(6) as u8,
            bits.take(3) as u8,
            bits.take(3) as u8,
        )
    } else {
        (0, 0, 0, 0)
    };

    if encrypted && auth_ind > 1 && usize::from(embedded_auth_len) >= layout::AUTH_SIZES.len() {
        return HeaderScan::Invalid;
    }

    HeaderScan::Ok(Header {
        msg_type,
        subtype,
        payload_len,
        encrypted,
        crc_type,
        time_tag_type,
        gnss_time_tag,
        solution_id,
        solution_proc_id,
        encryption_id,
        encryption_seq,
        auth_ind,
        embedded_auth_len,
    })
}

pub struct SpartnHandler;

impl ProtocolHandler for SpartnHandler {
    fn protocol(&self) -> Protocol {
        Protocol::Spartn
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        if buf[ofs] != layout::PREAMBLE {
            return Scan::NotFound;
        }
        let header = match parse_header(buf, ofs) {
            HeaderScan::Wait => return Scan::Wait,
            HeaderScan::Invalid => return Scan::NotFound,
            HeaderScan::Ok(header) => header,
        };
        let end = ofs + header.frame_len();
        if end > buf.len() {
            return Scan::Wait;
        }
        let crc_len = header.crc_len();
        let body = &buf[ofs + 1..end - crc_len];
        let mut expected = 0u64;
        for byte in &buf[end - crc_len..end] {
            expected = (expected << 8) | u64::from(*byte);
        }
        if crc::body_crc(body, header.crc_type) != expected {
            return Scan::NotFound;
        }
        Scan::Frame(end)
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        let header = match parse_header(raw, 0) {
            HeaderScan::Ok(header) => header,
            // The recognizer validated the span; anything else means the
            // caller handed us a foreign slice.
            _ => {
                return Err(SpecError::UnknownType(
                    "SPARTN frame without a valid header".to_string(),
                ));
            }
        };

        let mut fields = FieldMap::new();
        fields.insert("msgType", FieldValue::U64(u64::from(header.msg_type)));
        fields.insert("msgSubtype", FieldValue::U64(u64::from(header.subtype)));
        fields.insert("payloadLen", FieldValue::U64(header.payload_len as u64));
        fields.insert("encrypted", FieldValue::U64(u64::from(header.encrypted)));
        fields.insert("crcType", FieldValue::U64(u64::from(header.crc_type)));
        fields.insert(
            "timeTagType",
            FieldValue::U64(u64::from(header.time_tag_type)),
        );
        fields.insert("gnssTimeTag", FieldValue::U64(header.gnss_time_tag));
        fields.insert("solutionId", FieldValue::U64(u64::from(header.solution_id)));
        fields.insert(
            "solutionProcId",
            FieldValue::U64(u64::from(header.solution_proc_id)),
        );
        if header.encrypted {
            fields.insert(
                "encryptionId",
                FieldValue::U64(u64::from(header.encryption_id)),
            );
            fields.insert(
                "encryptionSeq",
                FieldValue::U64(u64::from(header.encryption_seq)),
            );
            fields.insert("authInd", FieldValue::U64(u64::from(header.auth_ind)));
            fields.insert(
                "embeddedAuthLen",
                FieldValue::U64(u64::from(header.embedded_auth_len)),
            );
        }

        let mut msg = Message::new(Protocol::Spartn, Direction::Output, raw.to_vec());
        msg.id = Some(format!("{}-{}", header.msg_type, header.subtype));
        match registry::lookup(header.msg_type, header.subtype) {
            Some(entry) => {
                msg.name = entry.name.to_string();
                msg.description = Some(entry.descr.to_string());
            }
            None => {
                msg.name = format!("SPARTN-{}-{}", header.msg_type, header.subtype);
            }
        }
        msg.fields = Some(fields);
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a frame from scratch, re-using the production CRC
    /// routines for the trailer values.
    fn build_frame(msg_type: u8, subtype: u8, crc_type: u8, payload: &[u8]) -> Vec<u8> {
        assert!(payload.len() < 1024);
        let mut word: u32 = (u32::from(msg_type) << 17)
            | ((payload.len() as u32) << 7)
            | (u32::from(crc_type) << 4);
        word |= u32::from(crc::crc4_bits(word >> 4, 20));

        let mut raw = vec![layout::PREAMBLE];
        raw.extend_from_slice(&word.to_be_bytes()[1..]);

        // Unencrypted descriptor with a 16-bit time tag: subtype(4),
        // timeTagType(1)=0, gnssTimeTag(16)=0x1234, solutionId(7)=5,
        // solutionProcId(4)=2.
        let desc: u32 = (u32::from(subtype) << 28) | (0x1234 << 11) | (5 << 4) | 2;
        raw.extend_from_slice(&desc.to_be_bytes());
        raw.extend_from_slice(payload);

        let body = crc::body_crc(&raw[1..], crc_type);
        let trailer = crc::crc_len(crc_type);
        raw.extend_from_slice(&body.to_be_bytes()[8 - trailer..]);
        raw
    }

    #[test]
    fn scan_accepts_a_complete_frame() {
        let raw = build_frame(0, 0, 1, &[0xAA; 24]);
        let handler = SpartnHandler;
        assert_eq!(handler.scan(&raw, 0), Scan::Frame(raw.len()));
    }

    #[test]
    fn scan_waits_on_truncation() {
        let raw = build_frame(1, 2, 2, &[0x55; 16]);
        let handler = SpartnHandler;
        for cut in 1..raw.len() {
            assert_eq!(handler.scan(&raw[..cut], 0), Scan::Wait, "cut at {cut}");
        }
    }

    #[test]
    fn corrupt_header_crc_is_rejected() {
        let mut raw = build_frame(0, 0, 1, &[0xAA; 8]);
        raw[2] ^= 0x40;
        assert_eq!(SpartnHandler.scan(&raw, 0), Scan::NotFound);
    }

    #[test]
    fn corrupt_body_is_rejected() {
        let mut raw = build_frame(0, 0, 3, &[0xAA; 8]);
        let payload_start = layout::FRAME_START_LEN + layout::DESC_SHORT;
        raw[payload_start + 2] ^= 0x01;
        assert_eq!(SpartnHandler.scan(&raw, 0), Scan::NotFound);
    }

    #[test]
    fn process_exposes_header_fields() {
        let raw = build_frame(1, 3, 0, &[0x11; 4]);
        let msg = SpartnHandler.process(&raw).unwrap();
        assert_eq!(msg.name, "HPAC-BEIDOU");
        assert_eq!(msg.id.as_deref(), Some("1-3"));
        let fields = msg.fields.unwrap();
        assert_eq!(fields.get("gnssTimeTag").and_then(|v| v.as_i64()), Some(0x1234));
        assert_eq!(fields.get("solutionId").and_then(|v| v.as_i64()), Some(5));
        assert_eq!(fields.get("payloadLen").and_then(|v| v.as_i64()), Some(4));
        assert!(fields.get("encryptionId").is_none());
    }

    #[test]
    fn unknown_type_gets_a_fallback_name() {
        let raw = build_frame(9, 1, 0, &[0x00; 2]);
        let msg = SpartnHandler.process(&raw).unwrap();
        assert_eq!(msg.name, "SPARTN-9-1");
    }
}
