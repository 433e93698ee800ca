use crate::parser::helpers::{read_fixed_str, read_i32_le, read_u16_le, read_u32_le, read_u8};
use crate::types::{
    DecodedMessage, MessageIdentity, MonVer, NavPosllh, NavPvt, RawFrame, UbxMessage, CLASS_ACK,
    CLASS_INF, CLASS_MON, CLASS_NAV, ID_ACK_ACK, ID_ACK_NAK, ID_MON_VER, ID_NAV_POSLLH,
    ID_NAV_PVT,
};
use anyhow::{bail, Result};

// Payload layouts, byte counts from the u-blox protocol specification
/// NAV-PVT is 84 bytes on protocol 14 and 92 bytes from protocol 15 on
pub const NAV_PVT_MIN_LEN: usize = 84;
pub const NAV_POSLLH_LEN: usize = 28;
pub const MON_VER_HEADER_LEN: usize = 40;
pub const MON_VER_EXTENSION_LEN: usize = 30;
pub const ACK_LEN: usize = 2;

/// Decode a validated frame into a typed message.
///
/// Never fails: identities without a layout become [`UbxMessage::Unparsed`]
/// and payloads that do not fit their layout become [`UbxMessage::Undecodable`].
pub fn decode_message(frame: &RawFrame<'_>) -> DecodedMessage {
    let identity = MessageIdentity::new(frame.class, frame.id);
    let payload = frame.payload;

    let decoded = match (frame.class, frame.id) {
        (CLASS_NAV, ID_NAV_PVT) => decode_nav_pvt(payload).map(UbxMessage::NavPvt),
        (CLASS_NAV, ID_NAV_POSLLH) => decode_nav_posllh(payload).map(UbxMessage::NavPosllh),
        (CLASS_MON, ID_MON_VER) => decode_mon_ver(payload).map(UbxMessage::MonVer),
        (CLASS_ACK, ID_ACK_ACK) | (CLASS_ACK, ID_ACK_NAK) => decode_ack(payload, frame.id),
        (CLASS_INF, _) => Ok(UbxMessage::Inf(decode_inf_text(payload))),
        _ => Ok(UbxMessage::Unparsed),
    };

    let message = decoded.unwrap_or_else(|err| UbxMessage::Undecodable {
        reason: err.to_string(),
    });

    DecodedMessage {
        offset: frame.offset,
        identity,
        message,
    }
}

pub fn decode_nav_pvt(payload: &[u8]) -> Result<NavPvt> {
    if payload.len() < NAV_PVT_MIN_LEN {
        bail!(
            "NAV-PVT payload is {} bytes, expected at least {}",
            payload.len(),
            NAV_PVT_MIN_LEN
        );
    }

    let u8_at = |o| read_u8(payload, o).unwrap_or_default();
    let u16_at = |o| read_u16_le(payload, o).unwrap_or_default();
    let u32_at = |o| read_u32_le(payload, o).unwrap_or_default();
    let i32_at = |o| read_i32_le(payload, o).unwrap_or_default();

    Ok(NavPvt {
        itow: u32_at(0),
        year: u16_at(4),
        month: u8_at(6),
        day: u8_at(7),
        hour: u8_at(8),
        min: u8_at(9),
        sec: u8_at(10),
        valid: u8_at(11),
        t_acc: u32_at(12),
        nano: i32_at(16),
        fix_type: u8_at(20),
        flags: u8_at(21),
        flags2: u8_at(22),
        num_sv: u8_at(23),
        lon: i32_at(24),
        lat: i32_at(28),
        height: i32_at(32),
        h_msl: i32_at(36),
        h_acc: u32_at(40),
        v_acc: u32_at(44),
        vel_n: i32_at(48),
        vel_e: i32_at(52),
        vel_d: i32_at(56),
        g_speed: i32_at(60),
        head_mot: i32_at(64),
        s_acc: u32_at(68),
        head_acc: u32_at(72),
        p_dop: u16_at(76),
    })
}

pub fn decode_nav_posllh(payload: &[u8]) -> Result<NavPosllh> {
    if payload.len() != NAV_POSLLH_LEN {
        bail!(
            "NAV-POSLLH payload is {} bytes, expected {}",
            payload.len(),
            NAV_POSLLH_LEN
        );
    }

    let u32_at = |o| read_u32_le(payload, o).unwrap_or_default();
    let i32_at = |o| read_i32_le(payload, o).unwrap_or_default();

    Ok(NavPosllh {
        itow: u32_at(0),
        lon: i32_at(4),
        lat: i32_at(8),
        height: i32_at(12),
        h_msl: i32_at(16),
        h_acc: u32_at(20),
        v_acc: u32_at(24),
    })
}

pub fn decode_mon_ver(payload: &[u8]) -> Result<MonVer> {
    if payload.len() < MON_VER_HEADER_LEN
        || (payload.len() - MON_VER_HEADER_LEN) % MON_VER_EXTENSION_LEN != 0
    {
        bail!(
            "MON-VER payload is {} bytes, expected {} + N*{}",
            payload.len(),
            MON_VER_HEADER_LEN,
            MON_VER_EXTENSION_LEN
        );
    }

    let extensions = (MON_VER_HEADER_LEN..payload.len())
        .step_by(MON_VER_EXTENSION_LEN)
        .filter_map(|offset| read_fixed_str(payload, offset, MON_VER_EXTENSION_LEN))
        .filter(|ext| !ext.is_empty())
        .collect();

    Ok(MonVer {
        sw_version: read_fixed_str(payload, 0, 30).unwrap_or_default(),
        hw_version: read_fixed_str(payload, 30, 10).unwrap_or_default(),
        extensions,
    })
}

fn decode_ack(payload: &[u8], id: u8) -> Result<UbxMessage> {
    if payload.len() != ACK_LEN {
        bail!("ACK payload is {} bytes, expected {}", payload.len(), ACK_LEN);
    }

    Ok(UbxMessage::Ack {
        acknowledged: MessageIdentity::new(payload[0], payload[1]),
        accepted: id == ID_ACK_ACK,
    })
}

fn decode_inf_text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .trim_end_matches(['\0', '\r', '\n'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(class: u8, id: u8, payload: &[u8]) -> RawFrame<'_> {
        RawFrame {
            offset: 0,
            class,
            id,
            declared_length: payload.len() as u16,
            payload,
            checksum: [0, 0],
        }
    }

    fn nav_pvt_payload() -> Vec<u8> {
        let mut p = vec![0u8; 92];
        p[0..4].copy_from_slice(&123_456u32.to_le_bytes());
        p[4..6].copy_from_slice(&2025u16.to_le_bytes());
        p[6] = 1;
        p[7] = 12;
        p[8] = 12;
        p[9] = 43;
        p[10] = 2;
        p[11] = 0x37;
        p[16..20].copy_from_slice(&(-5_000i32).to_le_bytes());
        p[20] = 3;
        p[21] = 0x01;
        p[23] = 18;
        p[24..28].copy_from_slice(&(-801_919_471i32).to_le_bytes());
        p[28..32].copy_from_slice(&257_889_186i32.to_le_bytes());
        p[32..36].copy_from_slice(&73_449i32.to_le_bytes());
        p[36..40].copy_from_slice(&100_902i32.to_le_bytes());
        p[60..64].copy_from_slice(&1_500i32.to_le_bytes());
        p[76..78].copy_from_slice(&110u16.to_le_bytes());
        p
    }

    #[test]
    fn test_decode_nav_pvt_fields() {
        let payload = nav_pvt_payload();
        let msg = decode_message(&frame(0x01, 0x07, &payload));
        assert_eq!(msg.name(), "NAV-PVT");

        let pvt = match msg.message {
            UbxMessage::NavPvt(pvt) => pvt,
            other => panic!("expected NAV-PVT, got {other:?}"),
        };
        assert_eq!(pvt.itow, 123_456);
        assert_eq!((pvt.year, pvt.month, pvt.day), (2025, 1, 12));
        assert_eq!((pvt.hour, pvt.min, pvt.sec), (12, 43, 2));
        assert_eq!(pvt.nano, -5_000);
        assert!(pvt.has_valid_date_time());
        assert!(pvt.gnss_fix_ok());
        assert_eq!(pvt.fix_type, 3);
        assert_eq!(pvt.num_sv, 18);
        assert_eq!(pvt.lon, -801_919_471);
        assert_eq!(pvt.lat, 257_889_186);
        assert_eq!(pvt.height, 73_449);
        assert_eq!(pvt.h_msl, 100_902);
        assert_eq!(pvt.g_speed, 1_500);
        assert_eq!(pvt.p_dop, 110);
    }

    #[test]
    fn test_short_nav_pvt_is_undecodable() {
        let payload = nav_pvt_payload();
        let msg = decode_message(&frame(0x01, 0x07, &payload[..40]));
        assert!(msg.is_undecodable());
        assert_eq!(msg.name(), "NAV-PVT");
    }

    #[test]
    fn test_protocol_14_nav_pvt_length_accepted() {
        let payload = nav_pvt_payload();
        assert!(decode_nav_pvt(&payload[..84]).is_ok());
    }

    #[test]
    fn test_decode_nav_posllh() {
        let mut payload = vec![0u8; 28];
        payload[4..8].copy_from_slice(&1_399_998_000i32.to_le_bytes());
        payload[8..12].copy_from_slice(&356_000_000i32.to_le_bytes());
        payload[12..16].copy_from_slice(&12_345i32.to_le_bytes());

        let msg = decode_message(&frame(0x01, 0x02, &payload));
        match msg.message {
            UbxMessage::NavPosllh(pos) => {
                assert_eq!(pos.lon, 1_399_998_000);
                assert_eq!(pos.lat, 356_000_000);
                assert_eq!(pos.height, 12_345);
            }
            other => panic!("expected NAV-POSLLH, got {other:?}"),
        }

        let msg = decode_message(&frame(0x01, 0x02, &payload[..27]));
        assert!(msg.is_undecodable());
    }

    #[test]
    fn test_decode_mon_ver() {
        let mut payload = vec![0u8; 40 + 2 * 30];
        payload[..11].copy_from_slice(b"ROM CORE 3.");
        payload[30..38].copy_from_slice(b"00080000");
        payload[40..52].copy_from_slice(b"FWVER=SPG 3.");
        payload[70..84].copy_from_slice(b"PROTVER=18.00 ");

        let msg = decode_message(&frame(0x0A, 0x04, &payload));
        match msg.message {
            UbxMessage::MonVer(ver) => {
                assert_eq!(ver.sw_version, "ROM CORE 3.");
                assert_eq!(ver.hw_version, "00080000");
                assert_eq!(ver.extensions, vec!["FWVER=SPG 3.", "PROTVER=18.00"]);
            }
            other => panic!("expected MON-VER, got {other:?}"),
        }

        assert!(decode_message(&frame(0x0A, 0x04, &payload[..50])).is_undecodable());
    }

    #[test]
    fn test_decode_ack_and_inf() {
        let msg = decode_message(&frame(0x05, 0x01, &[0x06, 0x8A]));
        assert_eq!(
            msg.message,
            UbxMessage::Ack {
                acknowledged: MessageIdentity::new(0x06, 0x8A),
                accepted: true,
            }
        );
        assert_eq!(msg.name(), "ACK-ACK");

        let msg = decode_message(&frame(0x04, 0x01, b"antenna open\0"));
        assert_eq!(msg.message, UbxMessage::Inf("antenna open".to_string()));
        assert_eq!(msg.name(), "INF-WARNING");
    }

    #[test]
    fn test_unknown_messages_pass_through_unparsed() {
        let msg = decode_message(&frame(0x01, 0x35, &[1, 2, 3]));
        assert_eq!(msg.message, UbxMessage::Unparsed);
        assert_eq!(msg.name(), "NAV-SAT");

        let msg = decode_message(&frame(0x01, 0x99, &[]));
        assert_eq!(msg.name(), "NAV-0x99");

        let msg = decode_message(&frame(0xF1, 0x00, &[]));
        assert_eq!(msg.name(), "UBX-0xF1-0x00");
        assert_eq!(msg.message, UbxMessage::Unparsed);
    }
}
