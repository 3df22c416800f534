//! CRC-24Q (polynomial 0x1864CFB, init 0) as used by the correction-data
//! transport layer.

const POLY: u32 = 0x0186_4CFB;

pub(crate) fn crc24q(data: &[u8]) -> u32 {
    let mut crc: u32 = 0;
    for byte in data {
        crc ^= u32::from(*byte) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}
