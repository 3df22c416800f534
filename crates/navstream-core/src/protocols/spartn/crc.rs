//! CRC family used by the SPARTN transport: a 4-bit header CRC plus
//! body CRCs of 8/16/24/32 bits selected by the frame header. All are
//! MSB-first with zero init.

pub(crate) const CRC4_POLY: u8 = 0x09;
pub(crate) const CRC8_POLY: u64 = 0x07;
pub(crate) const CRC16_POLY: u64 = 0x1021;
pub(crate) const CRC24_POLY: u64 = 0x86_4CFB;
pub(crate) const CRC32_POLY: u64 = 0x04C1_1DB7;

/// CRC-4 over the top `bits` of `value` (MSB first).
pub(crate) fn crc4_bits(value: u32, bits: usize) -> u8 {
    let mut crc: u8 = 0;
    for i in (0..bits).rev() {
        let bit = ((value >> i) & 1) as u8;
        let feedback = ((crc >> 3) & 1) ^ bit;
        crc = (crc << 1) & 0x0F;
        if feedback != 0 {
            crc ^= CRC4_POLY;
        }
    }
    crc
}

fn crc_msb(data: &[u8], width: usize, poly: u64) -> u64 {
    let top = 1u64 << (width - 1);
    let mask = if width == 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    let mut crc: u64 = 0;
    for byte in data {
        crc ^= u64::from(*byte) << (width - 8);
        for _ in 0..8 {
            crc = if crc & top != 0 {
                (crc << 1) ^ poly
            } else {
                crc << 1
            };
        }
        crc &= mask;
    }
    crc
}

/// Body CRC with the width selected by the frame's CRC-type field
/// (0 -> 8 bits .. 3 -> 32 bits).
pub(crate) fn body_crc(data: &[u8], crc_type: u8) -> u64 {
    match crc_type {
        0 => crc_msb(data, 8, CRC8_POLY),
        1 => crc_msb(data, 16, CRC16_POLY),
        2 => crc_msb(data, 24, CRC24_POLY),
        _ => crc_msb(data, 32, CRC32_POLY),
    }
}

/// Trailer length in bytes for a CRC-type field value.
pub(crate) fn crc_len(crc_type: u8) -> usize {
    usize::from(crc_type) + 1
}
