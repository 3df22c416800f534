//! Descriptions for common modem command tokens. The AT surface has no
//! field specs; bodies stay verbatim and only the token is resolved.

use std::collections::HashMap;
use std::sync::LazyLock;

pub(crate) struct AtEntry {
    pub token: &'static str,
    pub descr: &'static str,
}

const fn entry(token: &'static str, descr: &'static str) -> AtEntry {
    AtEntry { token, descr }
}

static ENTRIES: &[AtEntry] = &[
    entry("+CGMI", "Manufacturer identification"),
    entry("+CGMM", "Model identification"),
    entry("+CGMR", "Firmware revision"),
    entry("+CGSN", "Product serial number (IMEI)"),
    entry("+CCLK", "Real-time clock"),
    entry("+CSQ", "Signal quality"),
    entry("+CREG", "Network registration status"),
    entry("+CEREG", "EPS network registration status"),
    entry("+CPIN", "SIM PIN state"),
    entry("+COPS", "Operator selection"),
    entry("+CGDCONT", "PDP context definition"),
    entry("+CFUN", "Modem functionality level"),
    entry("+CGATT", "Packet domain attach status"),
    entry("OK", "Command accepted"),
    entry("ERROR", "Command rejected"),
];

static INDEX: LazyLock<HashMap<&'static str, &'static AtEntry>> =
    LazyLock::new(|| ENTRIES.iter().map(|entry| (entry.token, entry)).collect());

pub(crate) fn lookup(token: &str) -> Option<&'static AtEntry> {
    INDEX.get(token).copied()
}
