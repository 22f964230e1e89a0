//! Fixed-point field codecs with NMEA 2000 "not available" sentinels.
//!
//! Values are decoded by dividing the raw integer by a power-of-ten
//! resolution divisor rather than multiplying by its reciprocal, so a raw
//! `340` at 0.01 resolution comes back as exactly `3.4`.

/// Raw value reserved for "data not available", per field width.
pub const NA_U8: u8 = 0xFF;
pub const NA_U16: u16 = 0xFFFF;
pub const NA_I16: i16 = 0x7FFF;
pub const NA_U32: u32 = 0xFFFF_FFFF;

/// Resolution divisors (1 / resolution).
pub const RES_CENTI: f64 = 100.0;
pub const RES_MILLI: f64 = 1_000.0;
pub const RES_ANGLE: f64 = 10_000.0;

#[inline]
fn bytes<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    data.get(offset..offset + N)?.try_into().ok()
}

pub fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

/// Unsigned 1-byte value scaled by `multiplier`.
pub fn read_u8_scaled(data: &[u8], offset: usize, multiplier: f64) -> Option<f64> {
    match read_u8(data, offset)? {
        NA_U8 => None,
        raw => Some(raw as f64 * multiplier),
    }
}

pub fn read_u16_fixed(data: &[u8], offset: usize, divisor: f64) -> Option<f64> {
    match u16::from_le_bytes(bytes(data, offset)?) {
        NA_U16 => None,
        raw => Some(raw as f64 / divisor),
    }
}

pub fn read_i16_fixed(data: &[u8], offset: usize, divisor: f64) -> Option<f64> {
    match i16::from_le_bytes(bytes(data, offset)?) {
        NA_I16 => None,
        raw => Some(raw as f64 / divisor),
    }
}

pub fn read_u32_fixed(data: &[u8], offset: usize, divisor: f64) -> Option<f64> {
    match u32::from_le_bytes(bytes(data, offset)?) {
        NA_U32 => None,
        raw => Some(raw as f64 / divisor),
    }
}

// Writers. `None` encodes the NA sentinel; out-of-range values are clamped
// just below it so they never read back as "not available".

pub fn write_u8_scaled(buf: &mut [u8], offset: usize, value: Option<f64>, multiplier: f64) {
    buf[offset] = match value {
        Some(v) => (v / multiplier).round().clamp(0.0, (NA_U8 - 1) as f64) as u8,
        None => NA_U8,
    };
}

pub fn write_u16_fixed(buf: &mut [u8], offset: usize, value: Option<f64>, divisor: f64) {
    let raw = match value {
        Some(v) => (v * divisor).round().clamp(0.0, (NA_U16 - 1) as f64) as u16,
        None => NA_U16,
    };
    buf[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
}

pub fn write_i16_fixed(buf: &mut [u8], offset: usize, value: Option<f64>, divisor: f64) {
    let raw = match value {
        Some(v) => (v * divisor)
            .round()
            .clamp(-(NA_I16 as f64), (NA_I16 - 1) as f64) as i16,
        None => NA_I16,
    };
    buf[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
}

pub fn write_u32_fixed(buf: &mut [u8], offset: usize, value: Option<f64>, divisor: f64) {
    let raw = match value {
        Some(v) => (v * divisor).round().clamp(0.0, (NA_U32 - 1) as f64) as u32,
        None => NA_U32,
    };
    buf[offset..offset + 4].copy_from_slice(&raw.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_sentinels_read_as_none() {
        let data = [0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(read_u16_fixed(&data, 0, RES_CENTI), None);
        assert_eq!(read_i16_fixed(&data, 2, RES_ANGLE), None);
        assert_eq!(read_u32_fixed(&data, 4, RES_CENTI), None);
        assert_eq!(read_u8_scaled(&data, 0, 10.0), None);
    }

    #[test]
    fn test_decimal_values_come_back_exact() {
        let mut buf = [0u8; 8];
        write_u16_fixed(&mut buf, 0, Some(3.4), RES_CENTI);
        write_i16_fixed(&mut buf, 2, Some(-1.2), RES_MILLI);
        write_u32_fixed(&mut buf, 4, Some(42.0), RES_CENTI);
        assert_eq!(read_u16_fixed(&buf, 0, RES_CENTI), Some(3.4));
        assert_eq!(read_i16_fixed(&buf, 2, RES_MILLI), Some(-1.2));
        assert_eq!(read_u32_fixed(&buf, 4, RES_CENTI), Some(42.0));
    }

    #[test]
    fn test_short_buffer_reads_none() {
        assert_eq!(read_u16_fixed(&[0x01], 0, RES_CENTI), None);
        assert_eq!(read_u8(&[], 0), None);
    }

    #[test]
    fn test_out_of_range_is_clamped_not_na() {
        let mut buf = [0u8; 2];
        write_i16_fixed(&mut buf, 0, Some(1e9), RES_ANGLE);
        assert_eq!(i16::from_le_bytes(buf), NA_I16 - 1);
        write_u16_fixed(&mut buf, 0, Some(-5.0), RES_CENTI);
        assert_eq!(u16::from_le_bytes(buf), 0);
    }
}
