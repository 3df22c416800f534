//! Static RTCM3 message registry: numeric type -> name/description and,
//! for the station messages, a full big-endian bitfield layout.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::codec::{SpecNode, item, pad, scaled};

pub(crate) struct RtcmEntry {
    pub msg_type: u16,
    pub descr: &'static str,
    pub spec: Option<&'static [SpecNode]>,
}

const fn entry(msg_type: u16, descr: &'static str, spec: Option<&'static [SpecNode]>) -> RtcmEntry {
    RtcmEntry {
        msg_type,
        descr,
        spec,
    }
}

static STATION_ARP: &[SpecNode] = &[
    item("type", "BU12"),
    item("staId", "BU12"),
    item("itrf", "BU6"),
    item("gpsInd", "BU1"),
    item("gloInd", "BU1"),
    item("galInd", "BU1"),
    item("refInd", "BU1"),
    scaled("ecefX", "BI38", 0.0001),
    item("oscInd", "BU1"),
    pad("BU1"),
    scaled("ecefY", "BI38", 0.0001),
    item("quartCyc", "BU2"),
    scaled("ecefZ", "BI38", 0.0001),
];

static STATION_ARP_HEIGHT: &[SpecNode] = &[
    item("type", "BU12"),
    item("staId", "BU12"),
    item("itrf", "BU6"),
    item("gpsInd", "BU1"),
    item("gloInd", "BU1"),
    item("galInd", "BU1"),
    item("refInd", "BU1"),
    scaled("ecefX", "BI38", 0.0001),
    item("oscInd", "BU1"),
    pad("BU1"),
    scaled("ecefY", "BI38", 0.0001),
    item("quartCyc", "BU2"),
    scaled("ecefZ", "BI38", 0.0001),
    scaled("antHeight", "BU16", 0.0001),
];

static GLO_BIAS: &[SpecNode] = &[
    item("type", "BU12"),
    item("staId", "BU12"),
    item("cpbInd", "BU1"),
    pad("BU3"),
    item("signalMask", "BU4"),
    scaled("bias", "BI16[]", 0.02),
];

/// Counted descriptor strings after the type/staId header; every string
/// carries its own one-byte length.
static RCV_ANT_DESCR: &[SpecNode] = &[
    item("type", "BU12"),
    item("staId", "BU12"),
    item("antDescrLen", "U1"),
    item("antDescr", "CH1[antDescrLen]"),
    item("antSetupId", "U1"),
    item("antSerialLen", "U1"),
    item("antSerial", "CH1[antSerialLen]"),
    item("rcvTypeLen", "U1"),
    item("rcvType", "CH1[rcvTypeLen]"),
    item("rcvFwLen", "U1"),
    item("rcvFw", "CH1[rcvFwLen]"),
    item("rcvSerialLen", "U1"),
    item("rcvSerial", "CH1[rcvSerialLen]"),
];

/// MSM common header; the satellite/signal payload that follows stays
/// undecoded (its shape depends on the cell mask).
static MSM_HEADER: &[SpecNode] = &[
    item("type", "BU12"),
    item("staId", "BU12"),
    item("epoch", "BU30"),
    item("multiMsg", "BU1"),
    item("iods", "BU3"),
    pad("BU7"),
    item("clkSteer", "BU2"),
    item("extClk", "BU2"),
    item("smooth", "BU1"),
    item("smoothInt", "BU3"),
    item("satMask", "BX64"),
    item("sigMask", "BX32"),
];

static ENTRIES: &[RtcmEntry] = &[
    entry(1001, "L1-only GPS RTK observables", None),
    entry(1002, "Extended L1-only GPS RTK observables", None),
    entry(1003, "L1/L2 GPS RTK observables", None),
    entry(1004, "Extended L1/L2 GPS RTK observables", None),
    entry(1005, "Stationary RTK reference station ARP", Some(STATION_ARP)),
    entry(
        1006,
        "Stationary RTK reference station ARP with antenna height",
        Some(STATION_ARP_HEIGHT),
    ),
    entry(1007, "Antenna descriptor", None),
    entry(1008, "Antenna descriptor and serial number", None),
    entry(1009, "L1-only GLONASS RTK observables", None),
    entry(1010, "Extended L1-only GLONASS RTK observables", None),
    entry(1011, "L1/L2 GLONASS RTK observables", None),
    entry(1012, "Extended L1/L2 GLONASS RTK observables", None),
    entry(1013, "System parameters", None),
    entry(1019, "GPS ephemeris", None),
    entry(1020, "GLONASS ephemeris", None),
    entry(1029, "Unicode text string", None),
    entry(1033, "Receiver and antenna descriptors", Some(RCV_ANT_DESCR)),
    entry(1042, "BeiDou ephemeris", None),
    entry(1044, "QZSS ephemeris", None),
    entry(1045, "Galileo F/NAV ephemeris", None),
    entry(1046, "Galileo I/NAV ephemeris", None),
    entry(1074, "GPS MSM4", Some(MSM_HEADER)),
    entry(1075, "GPS MSM5", Some(MSM_HEADER)),
    entry(1077, "GPS MSM7", Some(MSM_HEADER)),
    entry(1084, "GLONASS MSM4", Some(MSM_HEADER)),
    entry(1085, "GLONASS MSM5", Some(MSM_HEADER)),
    entry(1087, "GLONASS MSM7", Some(MSM_HEADER)),
    entry(1094, "Galileo MSM4", Some(MSM_HEADER)),
    entry(1095, "Galileo MSM5", Some(MSM_HEADER)),
    entry(1097, "Galileo MSM7", Some(MSM_HEADER)),
    entry(1124, "BeiDou MSM4", Some(MSM_HEADER)),
    entry(1125, "BeiDou MSM5", Some(MSM_HEADER)),
    entry(1127, "BeiDou MSM7", Some(MSM_HEADER)),
    entry(1230, "GLONASS code-phase biases", Some(GLO_BIAS)),
    entry(4072, "Proprietary reference station PVT", None),
];

static INDEX: LazyLock<HashMap<u16, &'static RtcmEntry>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| (entry.msg_type, entry))
        .collect()
});

pub(crate) fn lookup(msg_type: u16) -> Option<&'static RtcmEntry> {
    INDEX.get(&msg_type).copied()
}

#[cfg(test)]
mod tests {
    use super::lookup;

    #[test]
    fn lookup_hits_and_misses() {
        assert!(lookup(1005).unwrap().spec.is_some());
        assert!(lookup(1033).unwrap().spec.is_some());
        assert!(lookup(1019).unwrap().spec.is_none());
        assert!(lookup(9999).is_none());
    }
}
