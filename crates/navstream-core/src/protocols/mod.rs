//! Protocol handlers.
//!
//! Each protocol follows a layered structure:
//! - `layout`: sentinels, offsets and limits (source of truth)
//! - `parser`: frame recognizer, processor and outbound constructor
//! - `registry`: immutable identifier -> (name, description, spec) tables
//! - `crc`: checksum algorithms owned by the protocol, where it has any
//!
//! Recognizers never allocate and never raise: they communicate through
//! [`Scan`] only. Processors are handed spans the recognizer already
//! validated.
//!
//! Version française (résumé):
//! Un module par protocole (layout/parser/registry/crc). Les
//! reconnaisseurs répondent uniquement via [`Scan`] ; les processeurs ne
//! reçoivent que des trames déjà validées.

use crate::codec::SpecError;
use crate::message::{Message, Protocol};

pub mod at;
pub(crate) mod common;
pub mod nmea;
pub mod rtcm3;
pub mod spartn;
pub mod text;
pub mod ubx;
pub mod unknown;

/// Result of trying a protocol's frame recognizer at a buffer offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Not enough bytes yet to decide; the caller must not advance.
    Wait,
    /// This protocol does not match at the offset.
    NotFound,
    /// A fully validated frame spans `[offset, end)`.
    Frame(usize),
}

/// One protocol's recognizer + processor pair.
pub trait ProtocolHandler: Sync {
    fn protocol(&self) -> Protocol;

    /// Scan from `ofs`; must not look behind `ofs`.
    fn scan(&self, buf: &[u8], ofs: usize) -> Scan;

    /// Turn a validated frame span into a message. Only spec-registry
    /// defects can fail here; malformed input never reaches a processor.
    fn process(&self, raw: &[u8]) -> Result<Message, SpecError>;
}
