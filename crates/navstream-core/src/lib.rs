//! Navstream core library: multi-protocol GNSS stream splitting and
//! decoding.
//!
//! A single byte stream from a GNSS receiver (or a replayed log) carries
//! several wire protocols at once: binary receiver control (UBX), text
//! sentences (NMEA), two correction transports (RTCM3, SPARTN), modem
//! commands (AT) and plain text lines. The [`Engine`] splits that stream
//! into typed [`Message`] values; each protocol handler validates frames
//! with its own checksum and decodes payloads through the declarative
//! field codec. Bytes nobody claims surface as `UNKNOWN` messages, so no
//! input byte is ever unaccounted for.
//!
//! Invariants:
//! - Recognizers never raise on malformed input; only static registry
//!   defects produce errors.
//! - Arbitrary fragmentation of the input is equivalent to one append.
//! - Concatenating the raw spans of all emitted messages (plus the final
//!   pending flush) reconstructs the input exactly.
//!
//! Version française (résumé):
//! Cette crate découpe un flux GNSS multi-protocoles (UBX, NMEA, RTCM3,
//! SPARTN, AT, texte) en messages typés. Chaque protocole valide ses
//! trames par somme de contrôle et décode sa charge utile via le codec
//! déclaratif. Les octets non réclamés deviennent des messages `UNKNOWN` :
//! aucun octet d'entrée n'est perdu.
//!
//! # Examples
//! ```
//! use navstream_core::{Engine, Protocol};
//!
//! let mut engine = Engine::new();
//! engine.append(b"$GPGLL,4717.11,N,00833.91,E,123519,A*22\r\n");
//! let messages = engine.parse()?;
//! assert_eq!(messages[0].protocol, Protocol::Nmea);
//! assert_eq!(messages[0].id.as_deref(), Some("GLL"));
//! # Ok::<(), navstream_core::SpecError>(())
//! ```

use serde::Serialize;

mod batch;
mod buffer;
pub mod codec;
mod engine;
mod message;
pub mod protocols;

pub use batch::{BatchError, decode_bytes, decode_log_file};
pub use buffer::ScanBuffer;
pub use codec::SpecError;
pub use engine::{Engine, make};
pub use message::{Direction, FieldMap, FieldValue, Message, Protocol};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the wall clock cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Offline decode report with deterministic ordering.
///
/// # Examples
/// ```
/// use navstream_core::decode_bytes;
///
/// let report = decode_bytes("session.log", b"\r\nOK\r\n")?;
/// assert_eq!(report.report_version, navstream_core::REPORT_VERSION);
/// assert_eq!(report.messages.len(), 1);
/// # Ok::<(), navstream_core::SpecError>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of report generation.
    pub generated_at: String,
    /// Input metadata.
    pub input: InputInfo,
    /// Per-protocol message counts, in stable protocol order; protocols
    /// with no messages are omitted.
    pub counts: Vec<ProtocolCount>,
    /// Every decoded message, in stream order.
    pub messages: Vec<MessageRecord>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "navstream").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path or label as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Message count for one protocol.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolCount {
    /// Protocol wire name (e.g., "UBX").
    pub protocol: String,
    /// Number of messages attributed to it.
    pub count: u64,
}

/// One decoded message as it appears in a report.
///
/// `raw` is rendered as the precomputed display text (hex dump for
/// binary protocols) rather than embedded as a byte array.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    /// Protocol wire name.
    pub protocol: String,
    /// Message direction.
    pub direction: Direction,
    /// Registry key, when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resolved label.
    pub name: String,
    /// Registry description, on a registry hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Frame length in bytes.
    pub length: u64,
    /// Display rendering of the raw frame.
    pub text: String,
    /// Decoded field mapping, when a spec matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldMap>,
}

impl From<&Message> for MessageRecord {
    fn from(msg: &Message) -> Self {
        MessageRecord {
            protocol: msg.protocol.name().to_string(),
            direction: msg.direction,
            id: msg.id.clone(),
            name: msg.name.clone(),
            description: msg.description.clone(),
            length: msg.raw.len() as u64,
            text: msg.text.clone(),
            fields: msg.fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let report = decode_bytes("mixed.log", b"\xFF\r\nOK\r\n").unwrap();
        let value = serde_json::to_value(&report).unwrap();

        let records = value["messages"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        // The unknown byte has no registry entry at all.
        assert!(records[0].get("id").is_none());
        assert!(records[0].get("fields").is_none());
        assert_eq!(records[1]["id"], "OK");
        assert_eq!(records[1]["description"], "Command accepted");
    }

    #[test]
    fn counts_follow_protocol_order() {
        let mut data = Vec::new();
        data.extend_from_slice(b"\r\nOK\r\n");
        data.extend_from_slice(b"$GPGLL,4717.11,N,00833.91,E,123519,A*22\r\n");
        let report = decode_bytes("session.log", &data).unwrap();
        let names: Vec<&str> = report
            .counts
            .iter()
            .map(|count| count.protocol.as_str())
            .collect();
        assert_eq!(names, vec!["NMEA", "AT"]);
    }
}
