//! Modem command framing: an echoed `AT...` line ending in CR, or a
//! CR-LF-delimited response line. Final result codes are consumed with
//! their trailing CR LF; other responses share the CR LF with the next
//! line so multi-line answers split without duplicating terminators.

use crate::codec::SpecError;
use crate::message::{Direction, Message, Protocol};

use super::{layout, registry};
use crate::protocols::common::is_printable;
use crate::protocols::{ProtocolHandler, Scan};

pub struct AtHandler;

impl ProtocolHandler for AtHandler {
    fn protocol(&self) -> Protocol {
        Protocol::At
    }

    fn scan(&self, buf: &[u8], ofs: usize) -> Scan {
        if ofs >= buf.len() {
            return Scan::Wait;
        }
        match buf[ofs] {
            b'A' | b'a' => scan_command(buf, ofs),
            layout::CR => scan_response(buf, ofs),
            _ => Scan::NotFound,
        }
    }

    fn process(&self, raw: &[u8]) -> Result<Message, SpecError> {
        let body = trim_terminators(raw);
        let token = command_token(body);

        let mut msg = Message::new(Protocol::At, Direction::Output, raw.to_vec());
        msg.id = Some(token.clone());
        msg.name = token.clone();
        if let Some(entry) = registry::lookup(&token) {
            msg.description = Some(entry.descr.to_string());
        }
        Ok(msg)
    }
}

/// Echoed command: `AT`/`at`, printable body, CR.
fn scan_command(buf: &[u8], ofs: usize) -> Scan {
    if ofs + 2 > buf.len() {
        return Scan::Wait;
    }
    if !buf[ofs + 1].eq_ignore_ascii_case(&b'T') {
        return Scan::NotFound;
    }
    for i in ofs + 2..buf.len() {
        if buf[i] == layout::CR {
            return Scan::Frame(i + 1);
        }
        if !is_printable(buf[i]) {
            return Scan::NotFound;
        }
    }
    Scan::Wait
}

/// Response: CR LF, printable body, CR LF. The trailing CR LF is kept in
/// the buffer for the next line unless a second CR LF follows it
/// immediately, or the body is a final result code.
fn scan_response(buf: &[u8], ofs: usize) -> Scan {
    if ofs + 2 > buf.len() {
        return Scan::Wait;
    }
    if buf[ofs + 1] != layout::LF {
        return Scan::NotFound;
    }
    // Sentence tie-break: CR LF followed by `$G`/`$P` belongs to the
    // text sentence protocol.
    if ofs + 3 > buf.len() {
        return Scan::Wait;
    }
    if buf[ofs + 2] == b'$' {
        if ofs + 4 > buf.len() {
            return Scan::Wait;
        }
        if buf[ofs + 3] == b'G' || buf[ofs + 3] == b'P' {
            return Scan::NotFound;
        }
    }

    let mut end_of_body = None;
    for i in ofs + 2..buf.len() {
        if buf[i] == layout::CR {
            end_of_body = Some(i);
            break;
        }
        if !is_printable(buf[i]) {
            return Scan::NotFound;
        }
    }
    let Some(cr) = end_of_body else {
        return Scan::Wait;
    };
    let body = &buf[ofs + 2..cr];
    if body.is_empty() {
        return Scan::NotFound;
    }
    if cr + 2 > buf.len() {
        return Scan::Wait;
    }
    if buf[cr + 1] != layout::LF {
        return Scan::NotFound;
    }

    if layout::is_final_result(body) {
        return Scan::Frame(cr + 2);
    }
    // Decide whether the trailing CR LF opens the next line or closes
    // this one.
    if cr + 3 > buf.len() {
        return Scan::Wait;
    }
    if buf[cr + 2] == layout::CR {
        if cr + 4 > buf.len() {
            return Scan::Wait;
        }
        if buf[cr + 3] == layout::LF {
            return Scan::Frame(cr + 2);
        }
    }
    Scan::Frame(cr)
}

fn trim_terminators(raw: &[u8]) -> &[u8] {
    let mut span = raw;
    while let [layout::CR | layout::LF, rest @ ..] = span {
        span = rest;
    }
    while let [rest @ .., layout::CR | layout::LF] = span {
        span = rest;
    }
    span
}

/// `AT+CFG=1` -> `+CFG`, `+CEREG: 1` -> `+CEREG`, `OK` -> `OK`.
fn command_token(body: &[u8]) -> String {
    if layout::is_final_result(body) {
        return String::from_utf8_lossy(body).to_uppercase();
    }
    let body = match body {
        [a, t, rest @ ..] if a.eq_ignore_ascii_case(&b'A') && t.eq_ignore_ascii_case(&b'T') => {
            rest
        }
        _ => body,
    };
    let token_end = body
        .iter()
        .position(|b| matches!(b, b'=' | b'?' | b':' | b' '))
        .unwrap_or(body.len());
    if token_end == 0 {
        return "AT".to_string();
    }
    String::from_utf8_lossy(&body[..token_end]).into_owned()
}

/// Wrap a command in `AT<cmd>\r` (`direction = Input`).
pub fn make(cmd: &str) -> Message {
    let raw = format!("AT{cmd}\r").into_bytes();
    let token = command_token(cmd.as_bytes());
    let mut msg = Message::new(Protocol::At, Direction::Input, raw);
    msg.id = Some(token.clone());
    msg.name = token;
    msg
}
