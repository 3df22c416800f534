//! Offline batch decoding: run the one-shot scan over a complete log and
//! aggregate the results into a versioned [`Report`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::codec::SpecError;
use crate::message::Protocol;
use crate::{
    DEFAULT_GENERATED_AT, InputInfo, MessageRecord, ProtocolCount, REPORT_VERSION, Report,
    ToolInfo, engine,
};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),
}

/// Decode a complete log file into a report.
pub fn decode_log_file(path: &Path) -> Result<Report, BatchError> {
    let data = fs::read(path)?;
    Ok(decode_bytes(&path.display().to_string(), &data)?)
}

/// Decode a complete in-memory buffer into a report. `path_label` only
/// labels the report's input section.
pub fn decode_bytes(path_label: &str, data: &[u8]) -> Result<Report, SpecError> {
    let messages = engine::make(data)?;

    let mut by_protocol: HashMap<Protocol, u64> = HashMap::new();
    for msg in &messages {
        *by_protocol.entry(msg.protocol).or_default() += 1;
    }
    let counts = Protocol::ALL
        .iter()
        .filter_map(|protocol| {
            by_protocol.get(protocol).map(|count| ProtocolCount {
                protocol: protocol.name().to_string(),
                count: *count,
            })
        })
        .collect();

    Ok(Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "navstream".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: generated_at(),
        input: InputInfo {
            path: path_label.to_string(),
            bytes: data.len() as u64,
        },
        counts,
        messages: messages.iter().map(MessageRecord::from).collect(),
    })
}

fn generated_at() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accounts_for_every_byte() {
        let mut data = Vec::new();
        data.extend_from_slice(b"AT+CSQ\r");
        data.extend_from_slice(&[0xDE, 0xAD]);
        data.extend_from_slice(
            b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n",
        );
        let report = decode_bytes("mixed.log", &data).unwrap();

        assert_eq!(report.input.bytes, data.len() as u64);
        let total: u64 = report.counts.iter().map(|c| c.count).sum();
        assert_eq!(total, report.messages.len() as u64);
        let length_sum: u64 = report.messages.iter().map(|m| m.length).sum();
        assert_eq!(length_sum, data.len() as u64);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = decode_log_file(Path::new("/nonexistent/session.log")).unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }
}
