/// Generator polynomial of the DVD disc-id checksum (reflected form).
pub const DVD_POLY: u64 = 0x92C6_4265_D321_39A4;

/// Per-byte contributions, built from the same bit recurrence as
/// [`update_bitwise`].
static TABLE: [u64; 256] = make_table(DVD_POLY);

const fn make_table(poly: u64) -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u64;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Running checksum accumulator. Starts at zero, no final inversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Crc64 {
    crc: u64,
}

impl Crc64 {
    #[must_use] pub fn new() -> Self { Self { crc: 0 } }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.crc = TABLE[((self.crc ^ u64::from(byte)) & 0xFF) as usize] ^ (self.crc >> 8);
        }
    }

    #[must_use] pub fn value(&self) -> u64 { self.crc }

    /// Digest bytes, least-significant byte first.
    #[must_use] pub fn finalize(&self) -> [u8; 8] { self.crc.to_le_bytes() }
}

/// Bit-at-a-time reference for [`Crc64::update`].
#[must_use] pub fn update_bitwise(mut crc: u64, data: &[u8]) -> u64 {
    for &byte in data {
        crc ^= u64::from(byte);
        for _ in 0..8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ DVD_POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_crc(data: &[u8]) -> u64 {
        let mut c = Crc64::new();
        c.update(data);
        c.value()
    }

    #[test]
    fn check_value() {
        assert_eq!(table_crc(b"123456789"), 0x6CAE_ADE7_CBA7_E80E);
    }

    #[test]
    fn empty_input_stays_zero() {
        assert_eq!(table_crc(&[]), 0);
        assert_eq!(Crc64::new().finalize(), [0u8; 8]);
    }

    #[test]
    fn table_entries() {
        assert_eq!(TABLE[0], 0);
        assert_eq!(TABLE[1], 0x0809_E8A2_9694_51E9);
        assert_eq!(TABLE[0x80], DVD_POLY);
        assert_eq!(TABLE[0xFF], 0x07F8_A79E_7273_CF58);
    }

    #[test]
    fn table_matches_bitwise_for_every_byte() {
        for b in 0..=255u8 {
            assert_eq!(table_crc(&[b]), update_bitwise(0, &[b]), "byte {b:#04x}");
        }
    }

    #[test]
    fn table_matches_bitwise_on_longer_input() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
        assert_eq!(table_crc(&data), update_bitwise(0, &data));
    }

    #[test]
    fn split_updates_equal_single_update() {
        let mut split = Crc64::new();
        split.update(b"1234");
        split.update(b"");
        split.update(b"56789");
        assert_eq!(split.value(), table_crc(b"123456789"));
    }

    #[test]
    fn finalize_is_little_endian() {
        let mut c = Crc64::new();
        c.update(b"123456789");
        assert_eq!(c.finalize(), [0x0E, 0xE8, 0xA7, 0xCB, 0xE7, 0xAD, 0xAE, 0x6C]);
    }
}
