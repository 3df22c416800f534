//! Static SPARTN message registry. Payloads are encrypted in the field,
//! so entries carry names/descriptions only; the decoded fields come from
//! the frame header.

use std::collections::HashMap;
use std::sync::LazyLock;

pub(crate) struct SpartnEntry {
    pub msg_type: u8,
    pub subtype: u8,
    pub name: &'static str,
    pub descr: &'static str,
}

const fn entry(msg_type: u8, subtype: u8, name: &'static str, descr: &'static str) -> SpartnEntry {
    SpartnEntry {
        msg_type,
        subtype,
        name,
        descr,
    }
}

static ENTRIES: &[SpartnEntry] = &[
    entry(0, 0, "OCB-GPS", "GPS orbit, clock and bias corrections"),
    entry(0, 1, "OCB-GLONASS", "GLONASS orbit, clock and bias corrections"),
    entry(0, 2, "OCB-GALILEO", "Galileo orbit, clock and bias corrections"),
    entry(0, 3, "OCB-BEIDOU", "BeiDou orbit, clock and bias corrections"),
    entry(0, 4, "OCB-QZSS", "QZSS orbit, clock and bias corrections"),
    entry(1, 0, "HPAC-GPS", "GPS high-precision atmosphere corrections"),
    entry(1, 1, "HPAC-GLONASS", "GLONASS high-precision atmosphere corrections"),
    entry(1, 2, "HPAC-GALILEO", "Galileo high-precision atmosphere corrections"),
    entry(1, 3, "HPAC-BEIDOU", "BeiDou high-precision atmosphere corrections"),
    entry(1, 4, "HPAC-QZSS", "QZSS high-precision atmosphere corrections"),
    entry(2, 0, "GAD", "Geographic area definition"),
    entry(3, 0, "BPAC", "Basic-precision atmosphere corrections"),
    entry(4, 0, "EAS-DYN", "Dynamic key exchange"),
    entry(4, 1, "EAS-GRP", "Group authentication"),
    entry(120, 0, "PROP", "Proprietary message"),
];

static INDEX: LazyLock<HashMap<(u8, u8), &'static SpartnEntry>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| ((entry.msg_type, entry.subtype), entry))
        .collect()
});

pub(crate) fn lookup(msg_type: u8, subtype: u8) -> Option<&'static SpartnEntry> {
    INDEX.get(&(msg_type, subtype)).copied()
}

#[cfg(test)]
mod tests {
    use super::lookup;

    #[test]
    fn lookup_hits_and_misses() {
        assert_eq!(lookup(0, 0).unwrap().name, "OCB-GPS");
        assert_eq!(lookup(2, 0).unwrap().name, "GAD");
        assert!(lookup(7, 7).is_none());
    }
}
