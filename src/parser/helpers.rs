//! Helper functions for UBX parsing
//!
//! Checksum calculation and bounds-checked little-endian field readers used
//! by the frame scanner and the payload decoder.

/// 8-bit Fletcher checksum over class, id, length and payload bytes
pub fn ubx_checksum(class: u8, id: u8, payload: &[u8]) -> [u8; 2] {
    let len = (payload.len() as u16).to_le_bytes();
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;

    for &byte in [class, id, len[0], len[1]].iter().chain(payload.iter()) {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }

    [ck_a, ck_b]
}

/// XOR checksum of an NMEA sentence body (text between `$` and `*`)
pub fn nmea_checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Parse a two-character hexadecimal checksum field
pub fn parse_hex_byte(digits: &[u8]) -> Option<u8> {
    let text = std::str::from_utf8(digits).ok()?;
    if text.len() != 2 {
        return None;
    }
    u8::from_str_radix(text, 16).ok()
}

pub fn read_u8(payload: &[u8], offset: usize) -> Option<u8> {
    payload.get(offset).copied()
}

pub fn read_u16_le(payload: &[u8], offset: usize) -> Option<u16> {
    let bytes = payload.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32_le(payload: &[u8], offset: usize) -> Option<u32> {
    let bytes = payload.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub fn read_i32_le(payload: &[u8], offset: usize) -> Option<i32> {
    read_u32_le(payload, offset).map(|v| v as i32)
}

/// Read a NUL-padded fixed-width ASCII field
pub fn read_fixed_str(payload: &[u8], offset: usize, width: usize) -> Option<String> {
    let bytes = payload.get(offset..offset + width)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(width);
    Some(String::from_utf8_lossy(&bytes[..end]).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ubx_checksum_known_frame() {
        // CFG-CFG save-all: B5 62 06 09 0D 00 ... 31 BF
        let payload = [
            0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x17,
        ];
        assert_eq!(ubx_checksum(0x06, 0x09, &payload), [0x31, 0xBF]);
    }

    #[test]
    fn test_ubx_checksum_empty_payload() {
        // MON-VER poll: B5 62 0A 04 00 00 0E 34
        assert_eq!(ubx_checksum(0x0A, 0x04, &[]), [0x0E, 0x34]);
    }

    #[test]
    fn test_nmea_checksum() {
        let body = b"GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
        assert_eq!(nmea_checksum(body), 0x47);
        assert_eq!(parse_hex_byte(b"47"), Some(0x47));
        assert_eq!(parse_hex_byte(b"4"), None);
        assert_eq!(parse_hex_byte(b"zz"), None);
    }

    #[test]
    fn test_little_endian_readers() {
        let payload = [0x01, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(read_u8(&payload, 0), Some(0x01));
        assert_eq!(read_u16_le(&payload, 0), Some(0x0201));
        assert_eq!(read_u32_le(&payload, 0), Some(0x04030201));
        assert_eq!(read_i32_le(&payload, 4), Some(-1));
        assert_eq!(read_i32_le(&payload, 5), None);
        assert_eq!(read_u8(&payload, 8), None);
    }

    #[test]
    fn test_read_fixed_str() {
        let mut field = [0u8; 10];
        field[..4].copy_from_slice(b"ROM ");
        field[4..7].copy_from_slice(b"SPG");
        assert_eq!(read_fixed_str(&field, 0, 10), Some("ROM SPG".to_string()));
        assert_eq!(read_fixed_str(&field, 5, 10), None);
    }
}
