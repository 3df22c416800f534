use thiserror::Error;

/// Defects in a static spec tree.
///
/// These indicate a programming error in a registry, not malformed input:
/// they propagate out of the decode/encode call instead of being converted
/// into a per-message failure.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unknown field type tag `{0}`")]
    UnknownType(String),
    #[error("invalid width {width} for type tag `{tag}`")]
    InvalidWidth { tag: String, width: usize },
    #[error("invalid repeat expression `{expr}`: {reason}")]
    Expr { expr: String, reason: String },
    #[error("byte-oriented field `{0}` is not bit-aligned")]
    Misaligned(String),
    #[error("encoding is not supported for field type `{0}`")]
    EncodeUnsupported(String),
}
