//! Spec-tree encoding: a field mapping back to raw payload bytes.
//!
//! Inverse of decode for the binary scalar and bitfield types only;
//! string-payload encoding is not defined for the framing protocols'
//! outbound use and raises immediately. A missing field encodes as zero
//! (outbound poll/config frames routinely carry sparse field maps).

use crate::message::{FieldMap, FieldValue};

use super::error::SpecError;
use super::expr;
use super::spec::{ParsedType, Repeat, SpecNode, TypeTag, parse_type};

struct BitWriter {
    out: Vec<u8>,
    /// Bits used in the trailing partial byte (0 = aligned).
    bit: usize,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            bit: 0,
        }
    }

    fn aligned(&self) -> bool {
        self.bit == 0
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// MSB-first append, mirroring the big-endian bitfield decode.
    fn push_bits(&mut self, width: usize, value: u64) {
        for i in (0..width).rev() {
            let bit = ((value >> i) & 1) as u8;
            if self.bit == 0 {
                self.out.push(bit << 7);
                self.bit = 1;
            } else {
                let last = self.out.len() - 1;
                self.out[last] |= bit << (7 - self.bit);
                self.bit = (self.bit + 1) % 8;
            }
        }
    }
}

/// Encode a field mapping against a spec tree into raw payload bytes.
pub fn encode(fields: &FieldMap, spec: &[SpecNode]) -> Result<Vec<u8>, SpecError> {
    let mut writer = BitWriter::new();
    encode_nodes(fields, spec, &mut writer)?;
    Ok(writer.out)
}

fn encode_nodes(
    fields: &FieldMap,
    nodes: &[SpecNode],
    writer: &mut BitWriter,
) -> Result<(), SpecError> {
    for node in nodes {
        match node {
            SpecNode::Leaf { name, ty, scale } => {
                let parsed = parse_type(ty)?;
                if !parsed.tag.is_encodable() {
                    return Err(SpecError::EncodeUnsupported(ty.to_string()));
                }
                encode_leaf(fields, *name, &parsed, *scale, writer)?;
            }
            SpecNode::Group {
                name,
                children,
                repeat,
            } => {
                encode_group(fields, *name, children, *repeat, writer)?;
            }
        }
    }
    Ok(())
}

fn encode_group(
    fields: &FieldMap,
    name: Option<&'static str>,
    children: &[SpecNode],
    repeat: Option<&'static str>,
    writer: &mut BitWriter,
) -> Result<(), SpecError> {
    let Some(repeat) = repeat else {
        // Single block: nested map when named, inline otherwise.
        return match name.and_then(|n| fields.get(n)) {
            Some(FieldValue::Map(child)) => encode_nodes(child, children, writer),
            _ if name.is_none() => encode_nodes(fields, children, writer),
            _ => encode_nodes(&FieldMap::new(), children, writer),
        };
    };

    let list: &[FieldValue] = match name.and_then(|n| fields.get(n)) {
        Some(FieldValue::List(items)) => items,
        _ => &[],
    };
    let count = if repeat.is_empty() {
        list.len()
    } else {
        resolve_count(repeat, fields)?
    };

    let empty = FieldMap::new();
    for i in 0..count {
        let element = match list.get(i) {
            Some(FieldValue::Map(map)) => map,
            _ => &empty,
        };
        encode_nodes(element, children, writer)?;
    }
    Ok(())
}

fn encode_leaf(
    fields: &FieldMap,
    name: Option<&'static str>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    writer: &mut BitWriter,
) -> Result<(), SpecError> {
    let value = name.and_then(|n| fields.get(n));
    match parsed.repeat {
        Repeat::One => encode_value(value, parsed, scale, writer, name),
        Repeat::Greedy => {
            let items: &[FieldValue] = match value {
                Some(FieldValue::List(items)) => items,
                _ => &[],
            };
            for item in items {
                encode_value(Some(item), parsed, scale, writer, name)?;
            }
            Ok(())
        }
        Repeat::Count(n) => encode_counted(value, parsed, scale, writer, name, n.max(0) as usize),
        Repeat::Expr(expr_text) => {
            let n = resolve_count(expr_text, fields)?;
            encode_counted(value, parsed, scale, writer, name, n)
        }
    }
}

fn encode_counted(
    value: Option<&FieldValue>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    writer: &mut BitWriter,
    name: Option<&'static str>,
    count: usize,
) -> Result<(), SpecError> {
    let items: &[FieldValue] = match value {
        Some(FieldValue::List(items)) => items,
        _ => &[],
    };
    for i in 0..count {
        encode_value(items.get(i), parsed, scale, writer, name)?;
    }
    Ok(())
}

fn resolve_count(expr_text: &str, fields: &FieldMap) -> Result<usize, SpecError> {
    let lookup = |name: &str| fields.get(name).and_then(FieldValue::as_i64);
    let n = expr::eval(expr_text, &lookup)?;
    Ok(usize::try_from(n).unwrap_or(0))
}

/// Raw integer for a value, honoring the inverse scale.
fn raw_int(value: Option<&FieldValue>, scale: Option<f64>) -> i64 {
    match (value, scale) {
        (None, _) => 0,
        (Some(v), Some(s)) => {
            let f = v.as_f64().unwrap_or(0.0);
            if s == 0.0 { 0 } else { (f / s).round() as i64 }
        }
        (Some(v), None) => v.as_i64().unwrap_or(0),
    }
}

fn hex_int(value: Option<&FieldValue>) -> i64 {
    match value {
        Some(FieldValue::Str(s)) => i64::from_str_radix(s.trim(), 16).unwrap_or(0),
        other => other.and_then(|v| v.as_i64()).unwrap_or(0),
    }
}

fn encode_value(
    value: Option<&FieldValue>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    writer: &mut BitWriter,
    name: Option<&'static str>,
) -> Result<(), SpecError> {
    let width = parsed.width;
    if !matches!(parsed.tag, TypeTag::Bu | TypeTag::Bi | TypeTag::Bx) && !writer.aligned() {
        return Err(SpecError::Misaligned(
            name.unwrap_or("<unnamed>").to_string(),
        ));
    }

    match parsed.tag {
        TypeTag::U | TypeTag::I => {
            let raw = raw_int(value, scale);
            writer.push_bytes(&raw.to_le_bytes()[..width]);
        }
        TypeTag::X => {
            let raw = hex_int(value);
            writer.push_bytes(&raw.to_le_bytes()[..width]);
        }
        TypeTag::R => {
            let f = value.and_then(FieldValue::as_f64).unwrap_or(0.0);
            let f = scale.map_or(f, |s| if s == 0.0 { 0.0 } else { f / s });
            if width == 4 {
                writer.push_bytes(&(f as f32).to_le_bytes());
            } else {
                writer.push_bytes(&f.to_le_bytes());
            }
        }
        TypeTag::Bu | TypeTag::Bi => {
            let raw = raw_int(value, scale) as u64;
            let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
            writer.push_bits(width, raw & mask);
        }
        TypeTag::Bx => {
            let raw = hex_int(value) as u64;
            let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
            writer.push_bits(width, raw & mask);
        }
        // is_encodable() already excluded everything else.
        other => return Err(SpecError::EncodeUnsupported(format!("{other:?}"))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::decode;
    use crate::codec::spec::{group, item, pad, scaled};

    #[test]
    fn encodes_scalars_little_endian() {
        static SPEC: &[SpecNode] = &[item("a", "U2"), item("b", "I2"), item("x", "X2")];
        let mut fields = FieldMap::new();
        fields.insert("a", FieldValue::U64(0x1234));
        fields.insert("b", FieldValue::I64(-2));
        fields.insert("x", FieldValue::Str("ABCD".to_string()));
        let raw = encode(&fields, SPEC).unwrap();
        assert_eq!(raw, vec![0x34, 0x12, 0xFE, 0xFF, 0xCD, 0xAB]);
    }

    #[test]
    fn missing_fields_encode_as_zero() {
        static SPEC: &[SpecNode] = &[item("a", "U2"), pad("U1"), item("b", "U1")];
        let raw = encode(&FieldMap::new(), SPEC).unwrap();
        assert_eq!(raw, vec![0, 0, 0, 0]);
    }

    #[test]
    fn scaled_round_trip() {
        static SPEC: &[SpecNode] = &[scaled("lat", "I4", 1e-7), scaled("pdop", "U2", 0.01)];
        let mut fields = FieldMap::new();
        fields.insert("lat", FieldValue::F64(48.1173));
        fields.insert("pdop", FieldValue::F64(1.23));
        let raw = encode(&fields, SPEC).unwrap();
        let back = decode(&raw, SPEC).unwrap();
        let FieldValue::F64(lat) = back.get("lat").unwrap() else {
            panic!("expected f64");
        };
        assert!((lat - 48.1173).abs() < 1e-6);
        assert_eq!(back.get("pdop"), Some(&FieldValue::F64(1.23)));
    }

    #[test]
    fn repeated_group_round_trip() {
        static SPEC: &[SpecNode] = &[
            item("n", "U1"),
            group("items", "n", &[item("id", "U1"), item("v", "U2")]),
        ];
        let mut a = FieldMap::new();
        a.insert("id", FieldValue::U64(7));
        a.insert("v", FieldValue::U64(300));
        let mut b = FieldMap::new();
        b.insert("id", FieldValue::U64(9));
        b.insert("v", FieldValue::U64(5));
        let mut fields = FieldMap::new();
        fields.insert("n", FieldValue::U64(2));
        fields.insert(
            "items",
            FieldValue::List(vec![FieldValue::Map(a), FieldValue::Map(b)]),
        );
        let raw = encode(&fields, SPEC).unwrap();
        assert_eq!(decode(&raw, SPEC).unwrap(), fields);
    }

    #[test]
    fn bitfield_round_trip() {
        static SPEC: &[SpecNode] = &[item("ty", "BU12"), item("neg", "BI12"), pad("BU8")];
        let mut fields = FieldMap::new();
        fields.insert("ty", FieldValue::U64(1005));
        fields.insert("neg", FieldValue::I64(-3));
        let raw = encode(&fields, SPEC).unwrap();
        assert_eq!(raw.len(), 4);
        let back = decode(&raw, SPEC).unwrap();
        assert_eq!(back.get("ty"), Some(&FieldValue::U64(1005)));
        assert_eq!(back.get("neg"), Some(&FieldValue::I64(-3)));
    }

    #[test]
    fn text_types_refuse_to_encode() {
        static SPEC: &[SpecNode] = &[item("t", "TK")];
        let err = encode(&FieldMap::new(), SPEC).unwrap_err();
        assert!(matches!(err, SpecError::EncodeUnsupported(_)));

        static STR_SPEC: &[SpecNode] = &[item("s", "CH30")];
        assert!(matches!(
            encode(&FieldMap::new(), STR_SPEC).unwrap_err(),
            SpecError::EncodeUnsupported(_)
        ));
    }

    #[test]
    fn greedy_array_takes_runtime_length() {
        static SPEC: &[SpecNode] = &[item("rates", "U1[]")];
        let mut fields = FieldMap::new();
        fields.insert(
            "rates",
            FieldValue::List(vec![
                FieldValue::U64(1),
                FieldValue::U64(2),
                FieldValue::U64(3),
            ]),
        );
        assert_eq!(encode(&fields, SPEC).unwrap(), vec![1, 2, 3]);
    }
}
