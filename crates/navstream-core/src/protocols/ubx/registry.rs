//! Static UBX message registry: identifier -> name, description and
//! payload layout. Loaded once, never mutated.
//!
//! Field names and scale factors follow the receiver interface
//! description; messages without a layout entry still resolve their
//! name/description so the log view can label them.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::codec::{SpecNode, group, item, pad, scaled};

pub(crate) struct UbxEntry {
    pub class: u8,
    pub id: u8,
    pub name: &'static str,
    pub descr: &'static str,
    pub spec: Option<&'static [SpecNode]>,
}

const fn entry(
    class: u8,
    id: u8,
    name: &'static str,
    descr: &'static str,
    spec: Option<&'static [SpecNode]>,
) -> UbxEntry {
    UbxEntry {
        class,
        id,
        name,
        descr,
        spec,
    }
}

static ACK_ACK: &[SpecNode] = &[item("clsID", "U1"), item("msgID", "U1")];

static NAV_PVT: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("year", "U2"),
    item("month", "U1"),
    item("day", "U1"),
    item("hour", "U1"),
    item("min", "U1"),
    item("sec", "U1"),
    item("valid", "X1"),
    item("tAcc", "U4"),
    item("nano", "I4"),
    item("fixType", "U1"),
    item("flags", "X1"),
    item("flags2", "X1"),
    item("numSV", "U1"),
    scaled("lon", "I4", 1e-7),
    scaled("lat", "I4", 1e-7),
    item("height", "I4"),
    item("hMSL", "I4"),
    item("hAcc", "U4"),
    item("vAcc", "U4"),
    item("velN", "I4"),
    item("velE", "I4"),
    item("velD", "I4"),
    item("gSpeed", "I4"),
    scaled("headMot", "I4", 1e-5),
    item("sAcc", "U4"),
    scaled("headAcc", "U4", 1e-5),
    scaled("pDOP", "U2", 0.01),
    item("flags3", "X2"),
    pad("U1[4]"),
    scaled("headVeh", "I4", 1e-5),
    scaled("magDec", "I2", 0.01),
    scaled("magAcc", "U2", 0.01),
];

static NAV_POSLLH: &[SpecNode] = &[
    item("iTOW", "U4"),
    scaled("lon", "I4", 1e-7),
    scaled("lat", "I4", 1e-7),
    item("height", "I4"),
    item("hMSL", "I4"),
    item("hAcc", "U4"),
    item("vAcc", "U4"),
];

static NAV_VELNED: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("velN", "I4"),
    item("velE", "I4"),
    item("velD", "I4"),
    item("speed", "U4"),
    item("gSpeed", "U4"),
    scaled("heading", "I4", 1e-5),
    item("sAcc", "U4"),
    scaled("cAcc", "U4", 1e-5),
];

static NAV_DOP: &[SpecNode] = &[
    item("iTOW", "U4"),
    scaled("gDOP", "U2", 0.01),
    scaled("pDOP", "U2", 0.01),
    scaled("tDOP", "U2", 0.01),
    scaled("vDOP", "U2", 0.01),
    scaled("hDOP", "U2", 0.01),
    scaled("nDOP", "U2", 0.01),
    scaled("eDOP", "U2", 0.01),
];

static NAV_STATUS: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("gpsFix", "U1"),
    item("flags", "X1"),
    item("fixStat", "X1"),
    item("flags2", "X1"),
    item("ttff", "U4"),
    item("msss", "U4"),
];

static NAV_SAT: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("version", "U1"),
    item("numSvs", "U1"),
    pad("U1[2]"),
    group(
        "svs",
        "numSvs",
        &[
            item("gnssId", "U1"),
            item("svId", "U1"),
            item("cno", "U1"),
            item("elev", "I1"),
            item("azim", "I2"),
            scaled("prRes", "I2", 0.1),
            item("flags", "X4"),
        ],
    ),
];

static NAV_SVINFO: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("numCh", "U1"),
    item("globalFlags", "X1"),
    pad("U1[2]"),
    group(
        "channels",
        "numCh",
        &[
            item("chn", "U1"),
            item("svid", "U1"),
            item("flags", "X1"),
            item("quality", "X1"),
            item("cno", "U1"),
            item("elev", "I1"),
            item("azim", "I2"),
            item("prRes", "I4"),
        ],
    ),
];

static NAV_CLOCK: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("clkB", "I4"),
    item("clkD", "I4"),
    item("tAcc", "U4"),
    item("fAcc", "U4"),
];

static NAV_TIMEGPS: &[SpecNode] = &[
    item("iTOW", "U4"),
    item("fTOW", "I4"),
    item("week", "I2"),
    item("leapS", "I1"),
    item("valid", "X1"),
    item("tAcc", "U4"),
];

static MON_VER: &[SpecNode] = &[
    item("swVersion", "CH30"),
    item("hwVersion", "CH10"),
    group("extension", "", &[item("extension", "CH30")]),
];

static MON_HW: &[SpecNode] = &[
    item("pinSel", "X4"),
    item("pinBank", "X4"),
    item("pinDir", "X4"),
    item("pinVal", "X4"),
    item("noisePerMS", "U2"),
    item("agcCnt", "U2"),
    item("aStatus", "U1"),
    item("aPower", "U1"),
    item("flags", "X1"),
    pad("U1"),
    item("usedMask", "X4"),
    item("VP", "X1[17]"),
    item("jamInd", "U1"),
    pad("U1[2]"),
    item("pinIrq", "X4"),
    item("pullH", "X4"),
    item("pullL", "X4"),
];

static INF_TEXT: &[SpecNode] = &[item("message", "CH")];

static CFG_MSG: &[SpecNode] = &[
    item("msgClass", "U1"),
    item("msgID", "U1"),
    item("rate", "U1[]"),
];

static CFG_RATE: &[SpecNode] = &[
    item("measRate", "U2"),
    item("navRate", "U2"),
    item("timeRef", "U2"),
];

static RXM_RTCM: &[SpecNode] = &[
    item("version", "U1"),
    item("flags", "X1"),
    item("subType", "U2"),
    item("refStation", "U2"),
    item("msgType", "U2"),
];

static RXM_RAWX: &[SpecNode] = &[
    item("rcvTow", "R8"),
    item("week", "U2"),
    item("leapS", "I1"),
    item("numMeas", "U1"),
    item("recStat", "X1"),
    item("version", "U1"),
    pad("U1[2]"),
    group(
        "meas",
        "numMeas",
        &[
            item("prMes", "R8"),
            item("cpMes", "R8"),
            item("doMes", "R4"),
            item("gnssId", "U1"),
            item("svId", "U1"),
            item("sigId", "U1"),
            item("freqId", "U1"),
            item("locktime", "U2"),
            item("cno", "U1"),
            item("prStdev", "X1"),
            item("cpStdev", "X1"),
            item("doStdev", "X1"),
            item("trkStat", "X1"),
            pad("U1"),
        ],
    ),
];

static SEC_UNIQID: &[SpecNode] = &[item("version", "U1"), pad("U1[3]"), item("uniqueId", "X1[5]")];

static TIM_TP: &[SpecNode] = &[
    item("towMS", "U4"),
    scaled("towSubMS", "U4", 2.328_306_436_538_696e-10),
    item("qErr", "I4"),
    item("week", "U2"),
    item("flags", "X1"),
    item("refInfo", "X1"),
];

static ENTRIES: &[UbxEntry] = &[
    entry(0x01, 0x02, "NAV-POSLLH", "Geodetic position solution", Some(NAV_POSLLH)),
    entry(0x01, 0x03, "NAV-STATUS", "Receiver navigation status", Some(NAV_STATUS)),
    entry(0x01, 0x04, "NAV-DOP", "Dilution of precision", Some(NAV_DOP)),
    entry(0x01, 0x06, "NAV-SOL", "Navigation solution information", None),
    entry(0x01, 0x07, "NAV-PVT", "Navigation position velocity time solution", Some(NAV_PVT)),
    entry(0x01, 0x12, "NAV-VELNED", "Velocity solution in NED frame", Some(NAV_VELNED)),
    entry(0x01, 0x14, "NAV-HPPOSLLH", "High precision geodetic position", None),
    entry(0x01, 0x20, "NAV-TIMEGPS", "GPS time solution", Some(NAV_TIMEGPS)),
    entry(0x01, 0x21, "NAV-TIMEUTC", "UTC time solution", None),
    entry(0x01, 0x22, "NAV-CLOCK", "Clock solution", Some(NAV_CLOCK)),
    entry(0x01, 0x30, "NAV-SVINFO", "Space vehicle information", Some(NAV_SVINFO)),
    entry(0x01, 0x35, "NAV-SAT", "Satellite information", Some(NAV_SAT)),
    entry(0x01, 0x43, "NAV-SIG", "Signal information", None),
    entry(0x01, 0x61, "NAV-EOE", "End of epoch", None),
    entry(0x02, 0x15, "RXM-RAWX", "Multi-GNSS raw measurement data", Some(RXM_RAWX)),
    entry(0x02, 0x32, "RXM-RTCM", "RTCM input status", Some(RXM_RTCM)),
    entry(0x02, 0x72, "RXM-PMP", "Point-to-multipoint correction data", None),
    entry(0x04, 0x00, "INF-ERROR", "ASCII error output", Some(INF_TEXT)),
    entry(0x04, 0x01, "INF-WARNING", "ASCII warning output", Some(INF_TEXT)),
    entry(0x04, 0x02, "INF-NOTICE", "ASCII informational output", Some(INF_TEXT)),
    entry(0x04, 0x03, "INF-TEST", "ASCII test output", Some(INF_TEXT)),
    entry(0x04, 0x04, "INF-DEBUG", "ASCII debug output", Some(INF_TEXT)),
    entry(0x05, 0x00, "ACK-NAK", "Message not acknowledged", Some(ACK_ACK)),
    entry(0x05, 0x01, "ACK-ACK", "Message acknowledged", Some(ACK_ACK)),
    entry(0x06, 0x00, "CFG-PRT", "Port configuration", None),
    entry(0x06, 0x01, "CFG-MSG", "Message rate configuration", Some(CFG_MSG)),
    entry(0x06, 0x04, "CFG-RST", "Reset receiver", None),
    entry(0x06, 0x08, "CFG-RATE", "Navigation/measurement rate settings", Some(CFG_RATE)),
    entry(0x06, 0x09, "CFG-CFG", "Clear, save and load configurations", None),
    entry(0x06, 0x24, "CFG-NAV5", "Navigation engine settings", None),
    entry(0x06, 0x8A, "CFG-VALSET", "Set configuration items", None),
    entry(0x06, 0x8B, "CFG-VALGET", "Get configuration items", None),
    entry(0x0A, 0x04, "MON-VER", "Receiver and software version", Some(MON_VER)),
    entry(0x0A, 0x09, "MON-HW", "Hardware status", Some(MON_HW)),
    entry(0x0A, 0x28, "MON-GNSS", "Major GNSS selection information", None),
    entry(0x0A, 0x36, "MON-COMMS", "Communication port information", None),
    entry(0x0D, 0x01, "TIM-TP", "Time pulse time data", Some(TIM_TP)),
    entry(0x10, 0x02, "ESF-MEAS", "External sensor fusion measurements", None),
    entry(0x10, 0x10, "ESF-STATUS", "External sensor fusion status", None),
    entry(0x21, 0x08, "LOG-INFO", "Log information", None),
    entry(0x27, 0x03, "SEC-UNIQID", "Unique chip identifier", Some(SEC_UNIQID)),
];

static INDEX: LazyLock<HashMap<(u8, u8), &'static UbxEntry>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| ((entry.class, entry.id), entry))
        .collect()
});

static NAME_INDEX: LazyLock<HashMap<&'static str, &'static UbxEntry>> =
    LazyLock::new(|| ENTRIES.iter().map(|entry| (entry.name, entry)).collect());

pub(crate) fn lookup(class: u8, id: u8) -> Option<&'static UbxEntry> {
    INDEX.get(&(class, id)).copied()
}

pub(crate) fn lookup_name(name: &str) -> Option<&'static UbxEntry> {
    NAME_INDEX.get(name).copied()
}

pub(crate) fn class_name(class: u8) -> Option<&'static str> {
    match class {
        0x01 => Some("NAV"),
        0x02 => Some("RXM"),
        0x04 => Some("INF"),
        0x05 => Some("ACK"),
        0x06 => Some("CFG"),
        0x09 => Some("UPD"),
        0x0A => Some("MON"),
        0x0B => Some("AID"),
        0x0D => Some("TIM"),
        0x10 => Some("ESF"),
        0x13 => Some("MGA"),
        0x21 => Some("LOG"),
        0x27 => Some("SEC"),
        0x28 => Some("HNR"),
        _ => None,
    }
}
