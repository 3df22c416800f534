//! Spec-tree decoding: raw bytes/tokens to a named field mapping.
//!
//! Recursive descent over the spec tree with a single bit cursor (byte
//! types require alignment, bitfields accumulate across byte boundaries)
//! and the current decoded scope for repeat expressions. Truncated input
//! ends the decode gracefully with the fields collected so far; only spec
//! defects raise.

use crate::message::{FieldMap, FieldValue};

use super::error::SpecError;
use super::expr;
use super::spec::{ParsedType, Repeat, SpecNode, TypeTag, parse_type};

/// Token delimiter for the comma/structure-delimited text types.
const TEXT_DELIM: u8 = b',';

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    bit: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, bit: 0 }
    }

    fn bits_left(&self) -> usize {
        self.data.len() * 8 - self.bit
    }

    fn aligned(&self) -> bool {
        self.bit % 8 == 0
    }

    fn byte_pos(&self) -> usize {
        self.bit / 8
    }

    fn take_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
        let start = self.byte_pos();
        let end = start.checked_add(n)?;
        if end > self.data.len() {
            return None;
        }
        self.bit += n * 8;
        Some(&self.data[start..end])
    }

    /// Big-endian bit accumulation across byte boundaries.
    fn take_bits(&mut self, n: usize) -> Option<u64> {
        if n == 0 || n > 64 || self.bits_left() < n {
            return None;
        }
        let mut value: u64 = 0;
        for _ in 0..n {
            let byte = self.data[self.bit / 8];
            let bit = (byte >> (7 - (self.bit % 8))) & 1;
            value = (value << 1) | u64::from(bit);
            self.bit += 1;
        }
        Some(value)
    }

    /// Next delimited token; consumes the trailing delimiter when present.
    /// `None` once the span is exhausted.
    fn take_token(&mut self) -> Option<&'a [u8]> {
        let start = self.byte_pos();
        if start >= self.data.len() {
            return None;
        }
        let mut end = start;
        while end < self.data.len() && self.data[end] != TEXT_DELIM {
            end += 1;
        }
        let consumed = if end < self.data.len() { end + 1 } else { end };
        self.bit = consumed * 8;
        Some(&self.data[start..end])
    }

    fn take_rest(&mut self) -> Option<&'a [u8]> {
        let start = self.byte_pos();
        if start >= self.data.len() {
            return None;
        }
        self.bit = self.data.len() * 8;
        Some(&self.data[start..])
    }
}

/// Outcome of a single leaf decode.
enum Decoded {
    Value(FieldValue),
    /// Empty text token: field omitted, scanning continues.
    Skip,
    /// Span exhausted: stop decoding the message.
    End,
}

/// Decode a byte/char span against a spec tree.
pub fn decode(data: &[u8], spec: &[SpecNode]) -> Result<FieldMap, SpecError> {
    let mut cursor = Cursor::new(data);
    let mut scope = FieldMap::new();
    decode_nodes(&mut cursor, spec, &mut scope, None)?;
    Ok(scope)
}

/// Returns `Ok(false)` when the span ran out and the caller should stop.
fn decode_nodes(
    cursor: &mut Cursor<'_>,
    nodes: &[SpecNode],
    scope: &mut FieldMap,
    parent: Option<&FieldMap>,
) -> Result<bool, SpecError> {
    for node in nodes {
        match node {
            SpecNode::Leaf { name, ty, scale } => {
                let parsed = parse_type(ty)?;
                if !decode_leaf(cursor, *name, &parsed, *scale, scope, parent)? {
                    return Ok(false);
                }
            }
            SpecNode::Group {
                name,
                children,
                repeat,
            } => match repeat {
                None => match name {
                    Some(name) => {
                        let mut child = FieldMap::new();
                        let more = decode_nodes(cursor, children, &mut child, Some(scope))?;
                        scope.insert(*name, FieldValue::Map(child));
                        if !more {
                            return Ok(false);
                        }
                    }
                    None => {
                        if !decode_nodes(cursor, children, scope, parent)? {
                            return Ok(false);
                        }
                    }
                },
                Some(repeat) => {
                    if !decode_repeated_group(cursor, *name, children, repeat, scope)? {
                        return Ok(false);
                    }
                }
            },
        }
    }
    Ok(true)
}

fn decode_repeated_group(
    cursor: &mut Cursor<'_>,
    name: Option<&'static str>,
    children: &[SpecNode],
    repeat: &str,
    scope: &mut FieldMap,
) -> Result<bool, SpecError> {
    let count = if repeat.is_empty() {
        None // until exhausted
    } else {
        Some(resolve_count(repeat, scope, None)?)
    };

    let mut items = Vec::new();
    let mut more = true;
    let mut index = 0usize;
    loop {
        if let Some(count) = count {
            if index >= count {
                break;
            }
        }
        if cursor.bits_left() == 0 {
            more = false;
            break;
        }
        let before = cursor.bit;
        let mut child = FieldMap::new();
        let keep_going = decode_nodes(cursor, children, &mut child, Some(scope))?;
        if !child.is_empty() {
            items.push(FieldValue::Map(child));
        }
        if !keep_going {
            more = false;
            break;
        }
        // A zero-width child spec would loop forever.
        if cursor.bit == before {
            break;
        }
        index += 1;
    }

    if let Some(name) = name {
        scope.insert(name, FieldValue::List(items));
    }
    Ok(more)
}

fn decode_leaf(
    cursor: &mut Cursor<'_>,
    name: Option<&'static str>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    scope: &mut FieldMap,
    parent: Option<&FieldMap>,
) -> Result<bool, SpecError> {
    match parsed.repeat {
        Repeat::One => match decode_value(cursor, parsed, scale, name)? {
            Decoded::Value(value) => {
                if let Some(name) = name {
                    scope.insert(name, value);
                }
                Ok(true)
            }
            Decoded::Skip => Ok(true),
            Decoded::End => Ok(false),
        },
        Repeat::Greedy => {
            let mut items = Vec::new();
            let more = loop {
                match decode_value(cursor, parsed, scale, name)? {
                    Decoded::Value(value) => items.push(value),
                    Decoded::Skip => {}
                    Decoded::End => break false,
                }
            };
            if let Some(name) = name {
                scope.insert(name, FieldValue::List(items));
            }
            Ok(more)
        }
        Repeat::Count(n) if parsed.tag == TypeTag::Ch => {
            decode_char_run(cursor, name, parsed, scope, n)
        }
        Repeat::Count(n) => decode_counted(cursor, name, parsed, scale, scope, n),
        Repeat::Expr(expr_text) => {
            let n = resolve_count(expr_text, scope, parent)? as i64;
            if parsed.tag == TypeTag::Ch {
                decode_char_run(cursor, name, parsed, scope, n)
            } else {
                decode_counted(cursor, name, parsed, scale, scope, n)
            }
        }
    }
}

/// A repeated `CH` reads `count * width` bytes as a single NUL-trimmed
/// string (length-prefixed descriptor strings), not a list of fragments.
fn decode_char_run(
    cursor: &mut Cursor<'_>,
    name: Option<&'static str>,
    parsed: &ParsedType<'_>,
    scope: &mut FieldMap,
    count: i64,
) -> Result<bool, SpecError> {
    if !cursor.aligned() {
        return Err(misaligned(name));
    }
    let len = usize::try_from(count).unwrap_or(0) * parsed.width.max(1);
    let Some(bytes) = cursor.take_bytes(len) else {
        return Ok(false);
    };
    let trimmed = match bytes.iter().position(|b| *b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };
    if let Some(name) = name {
        scope.insert(name, FieldValue::Str(String::from_utf8_lossy(trimmed).into_owned()));
    }
    Ok(true)
}

fn decode_counted(
    cursor: &mut Cursor<'_>,
    name: Option<&'static str>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    scope: &mut FieldMap,
    count: i64,
) -> Result<bool, SpecError> {
    let count = usize::try_from(count).unwrap_or(0);
    let mut items = Vec::new();
    let mut more = true;
    for _ in 0..count {
        match decode_value(cursor, parsed, scale, name)? {
            Decoded::Value(value) => items.push(value),
            Decoded::Skip => {}
            Decoded::End => {
                more = false;
                break;
            }
        }
    }
    if let Some(name) = name {
        scope.insert(name, FieldValue::List(items));
    }
    Ok(more)
}

fn resolve_count(
    expr_text: &str,
    scope: &FieldMap,
    parent: Option<&FieldMap>,
) -> Result<usize, SpecError> {
    let lookup = |name: &str| -> Option<i64> {
        scope
            .get(name)
            .and_then(FieldValue::as_i64)
            .or_else(|| parent.and_then(|p| p.get(name)).and_then(FieldValue::as_i64))
    };
    let n = expr::eval(expr_text, &lookup)?;
    Ok(usize::try_from(n).unwrap_or(0))
}

fn misaligned(name: Option<&'static str>) -> SpecError {
    SpecError::Misaligned(name.unwrap_or("<unnamed>").to_string())
}

fn apply_scale(raw: f64, scale: Option<f64>) -> Option<FieldValue> {
    scale.map(|s| FieldValue::F64(raw * s))
}

fn decode_value(
    cursor: &mut Cursor<'_>,
    parsed: &ParsedType<'_>,
    scale: Option<f64>,
    name: Option<&'static str>,
) -> Result<Decoded, SpecError> {
    let tag = parsed.tag;
    let width = parsed.width;

    if tag.is_binary() && !matches!(tag, TypeTag::Bu | TypeTag::Bi | TypeTag::Bx) && !cursor.aligned()
    {
        return Err(misaligned(name));
    }

    let value = match tag {
        TypeTag::U => {
            let Some(bytes) = cursor.take_bytes(width) else {
                return Ok(Decoded::End);
            };
            let raw = le_unsigned(bytes);
            apply_scale(raw as f64, scale).unwrap_or(FieldValue::U64(raw))
        }
        TypeTag::I => {
            let Some(bytes) = cursor.take_bytes(width) else {
                return Ok(Decoded::End);
            };
            let raw = le_signed(bytes);
            apply_scale(raw as f64, scale).unwrap_or(FieldValue::I64(raw))
        }
        TypeTag::X => {
            let Some(bytes) = cursor.take_bytes(width) else {
                return Ok(Decoded::End);
            };
            let raw = le_unsigned(bytes);
            FieldValue::Str(format!("{raw:0nibbles$X}", nibbles = width * 2))
        }
        TypeTag::R => {
            let Some(bytes) = cursor.take_bytes(width) else {
                return Ok(Decoded::End);
            };
            let raw = if width == 4 {
                f64::from(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            } else {
                f64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ])
            };
            FieldValue::F64(scale.map_or(raw, |s| raw * s))
        }
        TypeTag::Ch => {
            let bytes = if width == 0 {
                match cursor.take_rest() {
                    Some(bytes) => bytes,
                    None => return Ok(Decoded::End),
                }
            } else {
                match cursor.take_bytes(width) {
                    Some(bytes) => bytes,
                    None => return Ok(Decoded::End),
                }
            };
            let trimmed = match bytes.iter().position(|b| *b == 0) {
                Some(nul) => &bytes[..nul],
                None => bytes,
            };
            FieldValue::Str(String::from_utf8_lossy(trimmed).into_owned())
        }
        TypeTag::Bu => {
            let Some(raw) = cursor.take_bits(width) else {
                return Ok(Decoded::End);
            };
            apply_scale(raw as f64, scale).unwrap_or(FieldValue::U64(raw))
        }
        TypeTag::Bi => {
            let Some(raw) = cursor.take_bits(width) else {
                return Ok(Decoded::End);
            };
            let signed = sign_extend(raw, width);
            apply_scale(signed as f64, scale).unwrap_or(FieldValue::I64(signed))
        }
        TypeTag::Bx => {
            let Some(raw) = cursor.take_bits(width) else {
                return Ok(Decoded::End);
            };
            FieldValue::Str(format!("{raw:0nibbles$X}", nibbles = width.div_ceil(4)))
        }
        TypeTag::Rs => {
            let Some(bytes) = cursor.take_rest() else {
                return Ok(Decoded::End);
            };
            FieldValue::Str(String::from_utf8_lossy(bytes).into_owned())
        }
        // Delimited text types.
        _ => {
            let Some(token) = cursor.take_token() else {
                return Ok(Decoded::End);
            };
            if token.is_empty() {
                return Ok(Decoded::Skip);
            }
            let text = String::from_utf8_lossy(token).into_owned();
            match tag {
                TypeTag::Tk => FieldValue::Str(text),
                TypeTag::Qs => FieldValue::Str(strip_quotes(&text).to_string()),
                TypeTag::Cc => {
                    FieldValue::Str(text.chars().next().map(String::from).unwrap_or_default())
                }
                TypeTag::Tm => FieldValue::Str(format_time(&text)),
                TypeTag::Dt => FieldValue::Str(format_date(&text)),
                TypeTag::Ll => match text.parse::<f64>() {
                    Ok(raw) => {
                        let degrees = (raw / 100.0).trunc();
                        let minutes = raw - degrees * 100.0;
                        FieldValue::F64(degrees + minutes / 60.0)
                    }
                    Err(_) => FieldValue::Str(text),
                },
                TypeTag::Ti => match text.parse::<i64>() {
                    Ok(raw) => apply_scale(raw as f64, scale).unwrap_or(FieldValue::I64(raw)),
                    Err(_) => FieldValue::Str(text),
                },
                TypeTag::Tu => match text.parse::<u64>() {
                    Ok(raw) => apply_scale(raw as f64, scale).unwrap_or(FieldValue::U64(raw)),
                    Err(_) => FieldValue::Str(text),
                },
                TypeTag::Tr => match text.parse::<f64>() {
                    Ok(raw) => FieldValue::F64(scale.map_or(raw, |s| raw * s)),
                    Err(_) => FieldValue::Str(text),
                },
                // Binary tags handled above.
                _ => return Err(SpecError::UnknownType(format!("{tag:?}"))),
            }
        }
    };

    Ok(Decoded::Value(value))
}

fn le_unsigned(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        value |= u64::from(*byte) << (8 * i);
    }
    value
}

fn le_signed(bytes: &[u8]) -> i64 {
    sign_extend(le_unsigned(bytes), bytes.len() * 8)
}

fn sign_extend(raw: u64, bits: usize) -> i64 {
    if bits >= 64 {
        return raw as i64;
    }
    let sign = 1u64 << (bits - 1);
    if raw & sign != 0 {
        (raw | !((1u64 << bits) - 1)) as i64
    } else {
        raw as i64
    }
}

fn strip_quotes(text: &str) -> &str {
    let stripped = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'));
    stripped.unwrap_or(text)
}

/// `HHMMSS(.sss)` -> `HH:MM:SS(.sss)`; anything else passes through.
fn format_time(token: &str) -> String {
    let (head, frac) = token.split_at(token.find('.').unwrap_or(token.len()));
    if head.len() != 6 || !head.bytes().all(|b| b.is_ascii_digit()) {
        return token.to_string();
    }
    format!("{}:{}:{}{}", &head[0..2], &head[2..4], &head[4..6], frac)
}

/// `DDMMYY` -> `YYYY-MM-DD`; century inferred as 1900+YY for YY >= 80.
fn format_date(token: &str) -> String {
    if token.len() != 6 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return token.to_string();
    }
    let yy: u32 = token[4..6].parse().unwrap_or(0);
    let year = if yy >= 80 { 1900 + yy } else { 2000 + yy };
    format!("{}-{}-{}", year, &token[2..4], &token[0..2])
}
