//! Static NMEA sentence registry.
//!
//! Sentence bodies are comma-delimited, so layouts use the text token
//! types. The `latN`/`latI` naming convention pairs each angular value
//! with its hemisphere indicator.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::codec::{SpecNode, group, item};

pub(crate) struct NmeaEntry {
    pub id: &'static str,
    pub descr: &'static str,
    pub spec: Option<&'static [SpecNode]>,
}

const fn entry(
    id: &'static str,
    descr: &'static str,
    spec: Option<&'static [SpecNode]>,
) -> NmeaEntry {
    NmeaEntry { id, descr, spec }
}

static GGA: &[SpecNode] = &[
    item("time", "TM"),
    item("latN", "LL"),
    item("latI", "CC"),
    item("longN", "LL"),
    item("longI", "CC"),
    item("quality", "TU"),
    item("numSV", "TU"),
    item("HDOP", "TR"),
    item("alt", "TR"),
    item("altUnit", "CC"),
    item("sep", "TR"),
    item("sepUnit", "CC"),
    item("diffAge", "TR"),
    item("diffStation", "TU"),
];

static RMC: &[SpecNode] = &[
    item("time", "TM"),
    item("status", "CC"),
    item("latN", "LL"),
    item("latI", "CC"),
    item("longN", "LL"),
    item("longI", "CC"),
    item("speed", "TR"),
    item("cog", "TR"),
    item("date", "DT"),
    item("mv", "TR"),
    item("mvI", "CC"),
    item("posMode", "CC"),
    item("navStatus", "CC"),
];

static GLL: &[SpecNode] = &[
    item("latN", "LL"),
    item("latI", "CC"),
    item("longN", "LL"),
    item("longI", "CC"),
    item("time", "TM"),
    item("status", "CC"),
    item("posMode", "CC"),
];

static GSA: &[SpecNode] = &[
    item("opMode", "CC"),
    item("navMode", "TU"),
    item("svid", "TU[12]"),
    item("PDOP", "TR"),
    item("HDOP", "TR"),
    item("VDOP", "TR"),
    item("systemId", "TU"),
];

static GSV: &[SpecNode] = &[
    item("numMsg", "TU"),
    item("msgNum", "TU"),
    item("numSV", "TU"),
    group(
        "sv",
        "min(4, numSV - (msgNum - 1) * 4)",
        &[
            item("svid", "TU"),
            item("elv", "TU"),
            item("az", "TU"),
            item("cno", "TU"),
        ],
    ),
    item("signalId", "TU"),
];

static VTG: &[SpecNode] = &[
    item("cogt", "TR"),
    item("cogtUnit", "CC"),
    item("cogm", "TR"),
    item("cogmUnit", "CC"),
    item("sogn", "TR"),
    item("sognUnit", "CC"),
    item("sogk", "TR"),
    item("sogkUnit", "CC"),
    item("posMode", "CC"),
];

static ZDA: &[SpecNode] = &[
    item("time", "TM"),
    item("day", "TU"),
    item("month", "TU"),
    item("year", "TU"),
    item("ltzh", "TI"),
    item("ltzn", "TU"),
];

static GNS: &[SpecNode] = &[
    item("time", "TM"),
    item("latN", "LL"),
    item("latI", "CC"),
    item("longN", "LL"),
    item("longI", "CC"),
    item("posMode", "TK"),
    item("numSV", "TU"),
    item("HDOP", "TR"),
    item("alt", "TR"),
    item("sep", "TR"),
    item("diffAge", "TR"),
    item("diffStation", "TU"),
    item("navStatus", "CC"),
];

static GST: &[SpecNode] = &[
    item("time", "TM"),
    item("rangeRms", "TR"),
    item("stdMajor", "TR"),
    item("stdMinor", "TR"),
    item("orient", "TR"),
    item("stdLat", "TR"),
    item("stdLong", "TR"),
    item("stdAlt", "TR"),
];

static GBS: &[SpecNode] = &[
    item("time", "TM"),
    item("errLat", "TR"),
    item("errLon", "TR"),
    item("errAlt", "TR"),
    item("svid", "TU"),
    item("prob", "TR"),
    item("bias", "TR"),
    item("stddev", "TR"),
    item("systemId", "TU"),
    item("signalId", "TU"),
];

static DTM: &[SpecNode] = &[
    item("datum", "TK"),
    item("subDatum", "TK"),
    item("latOff", "TR"),
    item("latI", "CC"),
    item("lonOff", "TR"),
    item("longI", "CC"),
    item("altOff", "TR"),
    item("refDatum", "TK"),
];

static TXT: &[SpecNode] = &[
    item("numMsg", "TU"),
    item("msgNum", "TU"),
    item("msgType", "TU"),
    item("text", "RS"),
];

static ENTRIES: &[NmeaEntry] = &[
    entry("DTM", "Datum reference", Some(DTM)),
    entry("GBS", "GNSS satellite fault detection", Some(GBS)),
    entry("GGA", "Global positioning system fix data", Some(GGA)),
    entry("GLL", "Latitude and longitude with time of fix", Some(GLL)),
    entry("GNS", "GNSS fix data", Some(GNS)),
    entry("GRS", "GNSS range residuals", None),
    entry("GSA", "DOP and active satellites", Some(GSA)),
    entry("GST", "GNSS pseudorange error statistics", Some(GST)),
    entry("GSV", "Satellites in view", Some(GSV)),
    entry("RMC", "Recommended minimum data", Some(RMC)),
    entry("TXT", "Text transmission", Some(TXT)),
    entry("VLW", "Dual ground/water distance", None),
    entry("VTG", "Course over ground and ground speed", Some(VTG)),
    entry("ZDA", "Time and date", Some(ZDA)),
    entry("PUBX", "Proprietary position/status sentence", None),
];

static INDEX: LazyLock<HashMap<&'static str, &'static NmeaEntry>> =
    LazyLock::new(|| ENTRIES.iter().map(|entry| (entry.id, entry)).collect());

pub(crate) fn lookup(id: &str) -> Option<&'static NmeaEntry> {
    INDEX.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::lookup;

    #[test]
    fn lookup_hits_and_misses() {
        assert!(lookup("GGA").unwrap().spec.is_some());
        assert!(lookup("GRS").unwrap().spec.is_none());
        assert!(lookup("ZZZ").is_none());
    }
}
