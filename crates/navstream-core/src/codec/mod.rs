//! FieldCodec: the stateless spec-tree interpreter.
//!
//! The codec is the only consumer of spec trees and has no
//! protocol-specific knowledge: protocol handlers pick the spec, the codec
//! turns raw bytes or delimited text tokens into named, typed, scaled
//! field values (and back, for the binary subset).
//!
//! Version française (résumé):
//! Interpréteur sans état des arbres de spécification : décodage des
//! octets/jetons en valeurs nommées et mises à l'échelle, encodage inverse
//! pour les types binaires uniquement.

mod decode;
mod encode;
mod error;
mod expr;
mod spec;

pub use decode::decode;
pub use encode::encode;
pub use error::SpecError;
pub use spec::{SpecNode, block, group, item, pad, scaled};
