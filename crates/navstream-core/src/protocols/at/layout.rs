pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Final result codes that terminate a command exchange. Matched
/// case-insensitively against a whole response body.
pub const FINAL_RESULTS: [&str; 9] = [
    "OK",
    "ERROR",
    "BUSY",
    "NO CARRIER",
    "NO ANSWER",
    "NO DIALTONE",
    "CONNECT",
    "RING",
    "ABORTED",
];

pub(crate) fn is_final_result(body: &[u8]) -> bool {
    FINAL_RESULTS
        .iter()
        .any(|token| body.eq_ignore_ascii_case(token.as_bytes()))
}
