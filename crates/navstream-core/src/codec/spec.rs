//! Declarative spec trees and the type-tag grammar.
//!
//! A spec tree is pure, immutable data built once per protocol registry.
//! A leaf type string is `TAG[WIDTH]["[" REPEAT "]"]`: one-or-two-letter
//! tag, width (bytes for byte types, bits for bitfields, absent for text
//! tokens), and an optional bracketed repeat which is empty (greedy), an
//! integer literal, or a restricted expression over sibling field names.

use super::error::SpecError;

/// One node of a layout spec tree.
#[derive(Debug, Clone, Copy)]
pub enum SpecNode {
    /// A single field (or repeated field) of a concrete type.
    Leaf {
        /// Field name; unnamed leaves are decoded and discarded (padding).
        name: Option<&'static str>,
        /// Type string, parsed by [`parse_type`].
        ty: &'static str,
        /// Multiplier applied to the raw value after decode.
        scale: Option<f64>,
    },
    /// An ordered sequence of children, optionally repeated.
    Group {
        name: Option<&'static str>,
        children: &'static [SpecNode],
        /// Repeat expression; `""` means repeat until the span is
        /// exhausted, `None` means a single inline block.
        repeat: Option<&'static str>,
    },
}

/// Named leaf.
pub const fn item(name: &'static str, ty: &'static str) -> SpecNode {
    SpecNode::Leaf {
        name: Some(name),
        ty,
        scale: None,
    }
}

/// Named leaf with a post-decode scale factor.
pub const fn scaled(name: &'static str, ty: &'static str, scale: f64) -> SpecNode {
    SpecNode::Leaf {
        name: Some(name),
        ty,
        scale: Some(scale),
    }
}

/// Unnamed leaf (reserved/padding bytes).
pub const fn pad(ty: &'static str) -> SpecNode {
    SpecNode::Leaf {
        name: None,
        ty,
        scale: None,
    }
}

/// Repeated sub-record; `repeat` follows the expression grammar, `""`
/// repeats until the enclosing span is exhausted.
pub const fn group(
    name: &'static str,
    repeat: &'static str,
    children: &'static [SpecNode],
) -> SpecNode {
    SpecNode::Group {
        name: Some(name),
        children,
        repeat: Some(repeat),
    }
}

/// Single nested block decoded under `name`.
pub const fn block(name: &'static str, children: &'static [SpecNode]) -> SpecNode {
    SpecNode::Group {
        name: Some(name),
        children,
        repeat: None,
    }
}

/// Parsed leaf type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeTag {
    /// Unsigned little-endian integer, 1/2/4/8 bytes.
    U,
    /// Signed little-endian integer, 1/2/4/8 bytes.
    I,
    /// Unsigned integer rendered as zero-padded upper hex.
    X,
    /// IEEE 754 float, 4/8 bytes.
    R,
    /// Fixed-width (or greedy, width 0) NUL-trimmed string. A bracketed
    /// repeat reads `repeat * width` bytes as one string.
    Ch,
    /// Big-endian unsigned bitfield, width in bits.
    Bu,
    /// Big-endian signed (two's-complement) bitfield.
    Bi,
    /// Big-endian bitfield rendered as hex.
    Bx,
    /// Bare text token up to the delimiter.
    Tk,
    /// Quoted text token (falls back to bare).
    Qs,
    /// Single character.
    Cc,
    /// Time token `HHMMSS(.sss)` -> `HH:MM:SS(.sss)`.
    Tm,
    /// Date token `DDMMYY` -> `YYYY-MM-DD`.
    Dt,
    /// Latitude/longitude token `DDDMM.mmmm` -> decimal degrees.
    Ll,
    /// Signed integer token.
    Ti,
    /// Unsigned integer token.
    Tu,
    /// Real token.
    Tr,
    /// Rest of the span, verbatim.
    Rs,
}

impl TypeTag {
    /// Byte/bit-oriented types, decoded from binary payloads.
    pub(crate) fn is_binary(self) -> bool {
        matches!(
            self,
            TypeTag::U
                | TypeTag::I
                | TypeTag::X
                | TypeTag::R
                | TypeTag::Ch
                | TypeTag::Bu
                | TypeTag::Bi
                | TypeTag::Bx
        )
    }

    /// Types the encoder supports (string payload encoding is not
    /// defined for the framing protocols' outbound use).
    pub(crate) fn is_encodable(self) -> bool {
        self.is_binary() && self != TypeTag::Ch
    }
}

/// Repeat annotation resolved from the bracket suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repeat<'a> {
    /// No brackets: a single scalar value.
    One,
    /// Empty brackets: consume until the enclosing span is exhausted.
    Greedy,
    /// Literal element count.
    Count(i64),
    /// Expression over already-decoded sibling fields.
    Expr(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ParsedType<'a> {
    pub tag: TypeTag,
    /// Bytes for byte types, bits for bitfields, 0 for widthless forms.
    pub width: usize,
    pub repeat: Repeat<'a>,
}

/// Parse a leaf type string. An unknown tag or malformed width is a
/// fatal spec defect.
pub(crate) fn parse_type(ty: &str) -> Result<ParsedType<'_>, SpecError> {
    let letters_end = ty
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(ty.len());
    let (letters, rest) = ty.split_at(letters_end);

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, bracket) = rest.split_at(digits_end);

    let repeat = match bracket {
        "" => Repeat::One,
        b if b.starts_with('[') && b.ends_with(']') => {
            let inner = b[1..b.len() - 1].trim();
            if inner.is_empty() {
                Repeat::Greedy
            } else if let Ok(n) = inner.parse::<i64>() {
                Repeat::Count(n)
            } else {
                Repeat::Expr(inner)
            }
        }
        _ => return Err(SpecError::UnknownType(ty.to_string())),
    };

    let tag = match letters {
        "U" => TypeTag::U,
        "I" => TypeTag::I,
        "X" => TypeTag::X,
        "R" => TypeTag::R,
        "CH" => TypeTag::Ch,
        "BU" => TypeTag::Bu,
        "BI" => TypeTag::Bi,
        "BX" => TypeTag::Bx,
        "TK" => TypeTag::Tk,
        "QS" => TypeTag::Qs,
        "CC" => TypeTag::Cc,
        "TM" => TypeTag::Tm,
        "DT" => TypeTag::Dt,
        "LL" => TypeTag::Ll,
        "TI" => TypeTag::Ti,
        "TU" => TypeTag::Tu,
        "TR" => TypeTag::Tr,
        "RS" => TypeTag::Rs,
        _ => return Err(SpecError::UnknownType(ty.to_string())),
    };

    let width = if digits.is_empty() {
        0
    } else {
        digits
            .parse::<usize>()
            .map_err(|_| SpecError::UnknownType(ty.to_string()))?
    };

    let invalid = |tag: &str, width: usize| SpecError::InvalidWidth {
        tag: tag.to_string(),
        width,
    };
    match tag {
        TypeTag::U | TypeTag::I | TypeTag::X => {
            if !matches!(width, 1 | 2 | 4 | 8) {
                return Err(invalid(letters, width));
            }
        }
        TypeTag::R => {
            if !matches!(width, 4 | 8) {
                return Err(invalid(letters, width));
            }
        }
        TypeTag::Bu | TypeTag::Bi | TypeTag::Bx => {
            if width == 0 || width > 64 {
                return Err(invalid(letters, width));
            }
        }
        TypeTag::Ch => {} // 0 = greedy rest-of-payload string
        _ => {
            if width != 0 {
                return Err(invalid(letters, width));
            }
        }
    }

    Ok(ParsedType { tag, width, repeat })
}
