//! Message model shared by every protocol handler.
//!
//! A [`Message`] is one recognized (or coalesced) unit of communication,
//! carrying an exclusively owned copy of its raw frame bytes, the resolved
//! identifier/name, and the optional decoded field mapping. Display text is
//! computed once at construction so log views never re-derive it.
//!
//! Version française (résumé):
//! Un [`Message`] représente une trame reconnue (ou des octets regroupés) :
//! copie des octets bruts, identifiant résolu, champs décodés optionnels et
//! texte d'affichage calculé une seule fois.

use serde::{Serialize, Serializer, ser::SerializeMap};

/// Wire protocols the dispatcher can attribute bytes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// Binary receiver-control protocol (sync `B5 62`).
    Ubx,
    /// Text sentence protocol (`$...*hh`).
    Nmea,
    /// Binary correction-data protocol (sync `D3`).
    Rtcm3,
    /// Binary correction-data protocol (sync `73`).
    Spartn,
    /// Modem command/response protocol.
    At,
    /// Generic printable line.
    Text,
    /// Fallback for bytes no handler claimed.
    Unknown,
}

impl Protocol {
    /// Every protocol, in report order.
    pub const ALL: [Protocol; 7] = [
        Protocol::Ubx,
        Protocol::Nmea,
        Protocol::Rtcm3,
        Protocol::Spartn,
        Protocol::At,
        Protocol::Text,
        Protocol::Unknown,
    ];

    /// Upper-case wire name, stable across releases.
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Ubx => "UBX",
            Protocol::Nmea => "NMEA",
            Protocol::Rtcm3 => "RTCM3",
            Protocol::Spartn => "SPARTN",
            Protocol::At => "AT",
            Protocol::Text => "TEXT",
            Protocol::Unknown => "UNKNOWN",
        }
    }

    /// Whether raw frames should be hex-dumped rather than text-dumped.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Protocol::Ubx | Protocol::Rtcm3 | Protocol::Spartn | Protocol::Unknown
        )
    }
}

/// Direction of a message relative to the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent to the device (outbound construction).
    Input,
    /// Received from the device.
    Output,
    /// Incomplete tail still sitting in the scan buffer.
    Pending,
}

/// One decoded field value.
///
/// The decoded shape is data-driven (spec trees), so values are dynamic:
/// scalars, ordered lists (repeated leaves/groups) and nested maps
/// (named groups).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U64(u64),
    I64(i64),
    F64(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(FieldMap),
}

impl FieldValue {
    /// Numeric coercion used by repeat-count expressions.
    ///
    /// Non-numeric values coerce to `None`; string values parse when they
    /// hold a plain integer (NMEA numeric tokens are already numeric, this
    /// covers hex-free identifiers only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::U64(v) => i64::try_from(*v).ok(),
            FieldValue::I64(v) => Some(*v),
            FieldValue::F64(v) => Some(*v as i64),
            FieldValue::Str(s) => s.trim().parse::<i64>().ok(),
            FieldValue::List(_) | FieldValue::Map(_) => None,
        }
    }

    /// Floating coercion, used when applying scale factors symmetrically.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::U64(v) => Some(*v as f64),
            FieldValue::I64(v) => Some(*v as f64),
            FieldValue::F64(v) => Some(*v),
            FieldValue::Str(s) => s.trim().parse::<f64>().ok(),
            FieldValue::List(_) | FieldValue::Map(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::U64(v) => serializer.serialize_u64(*v),
            FieldValue::I64(v) => serializer.serialize_i64(*v),
            FieldValue::F64(v) => serializer.serialize_f64(*v),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::List(items) => items.serialize(serializer),
            FieldValue::Map(map) => map.serialize(serializer),
        }
    }
}

/// Insertion-ordered field mapping.
///
/// Field counts per message are small, so lookup is a linear scan; the
/// insertion order is the declaration order of the spec tree and is
/// preserved through serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One recognized or coalesced unit of communication.
///
/// Created exclusively by a protocol handler's processor from a byte span
/// already validated by that handler's recognizer; the engine never builds
/// one speculatively.
#[derive(Debug, Clone)]
pub struct Message {
    pub protocol: Protocol,
    pub direction: Direction,
    /// Exact frame bytes, owned (never an alias into the scan buffer).
    pub raw: Vec<u8>,
    /// Protocol-specific registry key (e.g. `NAV-PVT`, `GGA`, `1005`).
    pub id: Option<String>,
    /// Human-readable resolved label.
    pub name: String,
    /// Registry description, present only on a registry hit.
    pub description: Option<String>,
    /// Decoded mapping, populated by exactly one codec decode call.
    pub fields: Option<FieldMap>,
    /// Display text derived from `raw` at construction time.
    pub text: String,
}

impl Message {
    /// Build a message with the display text precomputed from `raw`.
    ///
    /// The name defaults to the protocol name until the handler resolves
    /// a more specific one.
    pub fn new(protocol: Protocol, direction: Direction, raw: Vec<u8>) -> Self {
        let text = if protocol.is_binary() {
            hex_dump(&raw)
        } else {
            printable_text(&raw)
        };
        Message {
            protocol,
            direction,
            raw,
            id: None,
            name: protocol.name().to_string(),
            description: None,
            fields: None,
            text,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.protocol.is_binary()
    }
}

/// Upper-hex dump with one space between bytes (`B5 62 01 ...`).
pub(crate) fn hex_dump(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 3);
    for (i, byte) in raw.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Display-safe text: printable ASCII kept, everything else replaced,
/// trailing line terminators trimmed.
pub(crate) fn printable_text(raw: &[u8]) -> String {
    let trimmed = raw
        .iter()
        .rposition(|b| *b != b'\r' && *b != b'\n')
        .map_or(&raw[..0], |last| &raw[..=last]);
    trimmed
        .iter()
        .map(|b| {
            if (0x20..=0x7E).contains(b) {
                *b as char
            } else {
                '.'
            }
        })
        .collect()
}
