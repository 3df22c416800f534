//! Stream dispatcher: one scan buffer, every protocol recognizer tried at
//! every offset in a fixed priority order, byte-at-a-time resync for
//! anything nobody claims.
//!
//! Version française (résumé):
//! Le moteur possède un tampon unique. À chaque offset il essaie les
//! reconnaisseurs dans l'ordre de priorité ; au premier `Wait` il
//! s'arrête, les octets non réclamés deviennent des messages `UNKNOWN`,
//! et le reliquat est exposé comme message `Pending` sans être consommé.

use log::debug;

use crate::buffer::ScanBuffer;
use crate::codec::SpecError;
use crate::message::Message;
use crate::protocols::{
    ProtocolHandler, Scan, at::AtHandler, nmea::NmeaHandler, rtcm3::Rtcm3Handler,
    spartn::SpartnHandler, text::TextHandler, ubx::UbxHandler, unknown,
};

/// Recognizer priority: binary protocols before text protocols before
/// the generic line fallback, so an ambiguous prefix is claimed by the
/// most structured protocol that fully validates it.
static HANDLERS: &[&dyn ProtocolHandler] = &[
    &UbxHandler,
    &Rtcm3Handler,
    &SpartnHandler,
    &NmeaHandler,
    &AtHandler,
    &TextHandler,
];

/// Scan loop shared by the streaming and batch paths. Returns the
/// emitted messages and the offset of the last confirmed cut.
fn scan(buf: &[u8], final_pass: bool) -> Result<(Vec<Message>, usize), SpecError> {
    let mut messages = Vec::new();
    let mut done = 0;
    let mut ofs = 0;

    'scan: while ofs < buf.len() {
        for handler in HANDLERS {
            match handler.scan(buf, ofs) {
                Scan::Wait if final_pass => {}
                // More input needed: leave [done, ..) untouched.
                Scan::Wait => break 'scan,
                Scan::NotFound => {}
                Scan::Frame(end) => {
                    if ofs > done {
                        debug!(
                            "resync: {} unclaimed byte(s) before {} frame",
                            ofs - done,
                            handler.protocol().name()
                        );
                        messages.push(unknown::claimed(buf[done..ofs].to_vec()));
                    }
                    messages.push(handler.process(&buf[ofs..end])?);
                    done = end;
                    ofs = end;
                    continue 'scan;
                }
            }
        }
        // Nobody claimed this byte; retry one byte later.
        ofs += 1;
    }

    Ok((messages, done))
}

/// Multi-protocol stream splitter.
///
/// Single-threaded and synchronous; no internal locking and no maximum
/// buffer size. Bounding the buffer (and calling [`Engine::reset`] on
/// overflow) is the caller's policy.
#[derive(Default)]
pub struct Engine {
    buffer: ScanBuffer,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently buffered and not yet framed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Extend the scan buffer. Arbitrary fragmentation is fine: repeated
    /// appends produce the same messages as one contiguous append.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.append(bytes);
    }

    /// Scan the buffer and cut out every complete frame, in order.
    ///
    /// The buffer is compacted to the unconsumed suffix. A non-empty
    /// suffix is additionally surfaced as a trailing `Pending` message
    /// without being consumed, so the next call re-evaluates the same
    /// bytes once more input has arrived.
    pub fn parse(&mut self) -> Result<Vec<Message>, SpecError> {
        let (mut messages, done) = scan(self.buffer.as_slice(), false)?;
        self.buffer.consume_prefix(done);
        if !self.buffer.is_empty() {
            messages.push(unknown::pending(self.buffer.as_slice().to_vec()));
        }
        Ok(messages)
    }

    /// Flush: wrap whatever is buffered as one `Pending` message and
    /// clear the buffer.
    pub fn pending(&mut self) -> Option<Message> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(unknown::pending(self.buffer.take()))
    }

    /// Discard the buffer unconditionally (session/track switch).
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// One-shot scan of a complete in-memory buffer.
///
/// Same loop as [`Engine::parse`] with `Wait` treated as `NotFound`
/// (no more input is coming), so a trailing partial frame ends up in a
/// regular `UNKNOWN` message instead of a pending tail.
pub fn make(data: &[u8]) -> Result<Vec<Message>, SpecError> {
    let (mut messages, done) = scan(data, true)?;
    if done < data.len() {
        messages.push(unknown::claimed(data[done..].to_vec()));
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Direction, Protocol};
    use crate::protocols::nmea;

    const GGA: &[u8] =
        b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    #[test]
    fn parses_a_single_sentence() {
        let mut engine = Engine::new();
        engine.append(GGA);
        let messages = engine.parse().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].protocol, Protocol::Nmea);
        assert_eq!(messages[0].id.as_deref(), Some("GGA"));
        assert_eq!(engine.buffered(), 0);
    }

    #[test]
    fn garbage_before_a_frame_coalesces_into_unknown() {
        let mut engine = Engine::new();
        engine.append(&[0xFF, 0x00, 0x13]);
        engine.append(GGA);
        let messages = engine.parse().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].protocol, Protocol::Unknown);
        assert_eq!(messages[0].raw, vec![0xFF, 0x00, 0x13]);
        assert_eq!(messages[1].protocol, Protocol::Nmea);
    }

    #[test]
    fn partial_frame_surfaces_as_pending_and_stays_buffered() {
        let mut engine = Engine::new();
        engine.append(&GGA[..20]);
        let messages = engine.parse().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].direction, Direction::Pending);
        assert_eq!(engine.buffered(), 20);

        engine.append(&GGA[20..]);
        let messages = engine.parse().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].protocol, Protocol::Nmea);
        assert_eq!(engine.buffered(), 0);
    }

    #[test]
    fn pending_flush_clears_the_buffer() {
        let mut engine = Engine::new();
        engine.append(&GGA[..10]);
        let _ = engine.parse().unwrap();
        let pending = engine.pending().unwrap();
        assert_eq!(pending.direction, Direction::Pending);
        assert_eq!(pending.raw, GGA[..10].to_vec());
        assert_eq!(engine.buffered(), 0);
        assert!(engine.pending().is_none());
    }

    #[test]
    fn reset_discards_everything() {
        let mut engine = Engine::new();
        engine.append(b"half a line");
        engine.reset();
        assert_eq!(engine.buffered(), 0);
        assert!(engine.parse().unwrap().is_empty());
    }

    #[test]
    fn make_treats_a_trailing_partial_frame_as_unknown() {
        let mut data = GGA.to_vec();
        data.extend_from_slice(&[0xB5, 0x62, 0x01]);
        let messages = make(&data).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].protocol, Protocol::Nmea);
        assert_eq!(messages[1].protocol, Protocol::Unknown);
        assert_eq!(messages[1].direction, Direction::Output);
        assert_eq!(messages[1].raw, vec![0xB5, 0x62, 0x01]);
    }

    #[test]
    fn outbound_sentence_round_trips_through_the_engine() {
        let out = nmea::make("GPGLL,4717.11,N,00833.91,E,123519,A");
        let mut engine = Engine::new();
        engine.append(&out.raw);
        let messages = engine.parse().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id.as_deref(), Some("GLL"));
    }
}
