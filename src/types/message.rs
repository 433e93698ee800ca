use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// UBX message classes
pub const CLASS_NAV: u8 = 0x01;
pub const CLASS_RXM: u8 = 0x02;
pub const CLASS_INF: u8 = 0x04;
pub const CLASS_ACK: u8 = 0x05;
pub const CLASS_CFG: u8 = 0x06;
pub const CLASS_UPD: u8 = 0x09;
pub const CLASS_MON: u8 = 0x0A;
pub const CLASS_AID: u8 = 0x0B;
pub const CLASS_TIM: u8 = 0x0D;
pub const CLASS_ESF: u8 = 0x10;
pub const CLASS_MGA: u8 = 0x13;
pub const CLASS_LOG: u8 = 0x21;
pub const CLASS_SEC: u8 = 0x27;
pub const CLASS_HNR: u8 = 0x28;

// Message ids the decoder has layouts for
pub const ID_NAV_POSLLH: u8 = 0x02;
pub const ID_NAV_PVT: u8 = 0x07;
pub const ID_ACK_NAK: u8 = 0x00;
pub const ID_ACK_ACK: u8 = 0x01;
pub const ID_MON_VER: u8 = 0x04;

const CLASS_NAMES: &[(u8, &str)] = &[
    (CLASS_NAV, "NAV"),
    (CLASS_RXM, "RXM"),
    (CLASS_INF, "INF"),
    (CLASS_ACK, "ACK"),
    (CLASS_CFG, "CFG"),
    (CLASS_UPD, "UPD"),
    (CLASS_MON, "MON"),
    (CLASS_AID, "AID"),
    (CLASS_TIM, "TIM"),
    (CLASS_ESF, "ESF"),
    (CLASS_MGA, "MGA"),
    (CLASS_LOG, "LOG"),
    (CLASS_SEC, "SEC"),
    (CLASS_HNR, "HNR"),
];

const MESSAGE_NAMES: &[(u8, u8, &str)] = &[
    (CLASS_NAV, 0x01, "NAV-POSECEF"),
    (CLASS_NAV, ID_NAV_POSLLH, "NAV-POSLLH"),
    (CLASS_NAV, 0x03, "NAV-STATUS"),
    (CLASS_NAV, 0x04, "NAV-DOP"),
    (CLASS_NAV, 0x05, "NAV-ATT"),
    (CLASS_NAV, 0x06, "NAV-SOL"),
    (CLASS_NAV, ID_NAV_PVT, "NAV-PVT"),
    (CLASS_NAV, 0x09, "NAV-ODO"),
    (CLASS_NAV, 0x11, "NAV-VELECEF"),
    (CLASS_NAV, 0x12, "NAV-VELNED"),
    (CLASS_NAV, 0x13, "NAV-HPPOSECEF"),
    (CLASS_NAV, 0x14, "NAV-HPPOSLLH"),
    (CLASS_NAV, 0x20, "NAV-TIMEGPS"),
    (CLASS_NAV, 0x21, "NAV-TIMEUTC"),
    (CLASS_NAV, 0x22, "NAV-CLOCK"),
    (CLASS_NAV, 0x23, "NAV-TIMEGLO"),
    (CLASS_NAV, 0x24, "NAV-TIMEBDS"),
    (CLASS_NAV, 0x25, "NAV-TIMEGAL"),
    (CLASS_NAV, 0x26, "NAV-TIMELS"),
    (CLASS_NAV, 0x30, "NAV-SVINFO"),
    (CLASS_NAV, 0x32, "NAV-SBAS"),
    (CLASS_NAV, 0x35, "NAV-SAT"),
    (CLASS_NAV, 0x36, "NAV-COV"),
    (CLASS_NAV, 0x3C, "NAV-RELPOSNED"),
    (CLASS_NAV, 0x43, "NAV-SIG"),
    (CLASS_NAV, 0x60, "NAV-AOPSTATUS"),
    (CLASS_NAV, 0x61, "NAV-EOE"),
    (CLASS_RXM, 0x13, "RXM-SFRBX"),
    (CLASS_RXM, 0x14, "RXM-MEASX"),
    (CLASS_RXM, 0x15, "RXM-RAWX"),
    (CLASS_RXM, 0x32, "RXM-RTCM"),
    (CLASS_INF, 0x00, "INF-ERROR"),
    (CLASS_INF, 0x01, "INF-WARNING"),
    (CLASS_INF, 0x02, "INF-NOTICE"),
    (CLASS_INF, 0x03, "INF-TEST"),
    (CLASS_INF, 0x04, "INF-DEBUG"),
    (CLASS_ACK, ID_ACK_NAK, "ACK-NAK"),
    (CLASS_ACK, ID_ACK_ACK, "ACK-ACK"),
    (CLASS_CFG, 0x00, "CFG-PRT"),
    (CLASS_CFG, 0x01, "CFG-MSG"),
    (CLASS_CFG, 0x08, "CFG-RATE"),
    (CLASS_CFG, 0x09, "CFG-CFG"),
    (CLASS_CFG, 0x24, "CFG-NAV5"),
    (CLASS_CFG, 0x3E, "CFG-GNSS"),
    (CLASS_CFG, 0x8A, "CFG-VALSET"),
    (CLASS_CFG, 0x8B, "CFG-VALGET"),
    (CLASS_MON, 0x02, "MON-IO"),
    (CLASS_MON, ID_MON_VER, "MON-VER"),
    (CLASS_MON, 0x09, "MON-HW"),
    (CLASS_MON, 0x0B, "MON-HW2"),
    (CLASS_MON, 0x36, "MON-COMMS"),
    (CLASS_MON, 0x38, "MON-RF"),
    (CLASS_TIM, 0x01, "TIM-TP"),
    (CLASS_TIM, 0x03, "TIM-TM2"),
    (CLASS_ESF, 0x02, "ESF-MEAS"),
    (CLASS_ESF, 0x03, "ESF-RAW"),
    (CLASS_ESF, 0x10, "ESF-STATUS"),
    (CLASS_SEC, 0x03, "SEC-UNIQID"),
    (CLASS_HNR, 0x00, "HNR-PVT"),
];

/// Class/id pair identifying a UBX message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageIdentity {
    pub class: u8,
    pub id: u8,
}

impl MessageIdentity {
    pub const NAV_PVT: MessageIdentity = MessageIdentity::new(CLASS_NAV, ID_NAV_PVT);
    pub const NAV_POSLLH: MessageIdentity = MessageIdentity::new(CLASS_NAV, ID_NAV_POSLLH);
    pub const MON_VER: MessageIdentity = MessageIdentity::new(CLASS_MON, ID_MON_VER);

    pub const fn new(class: u8, id: u8) -> Self {
        Self { class, id }
    }

    /// Human-readable name, e.g. `NAV-PVT`.
    ///
    /// Unknown ids in a known class render as `NAV-0x99`, unknown classes as `UBX-0xCC-0xII`.
    pub fn name(&self) -> String {
        if let Some(&(_, _, name)) = MESSAGE_NAMES
            .iter()
            .find(|(class, id, _)| *class == self.class && *id == self.id)
        {
            return name.to_string();
        }

        match CLASS_NAMES.iter().find(|(class, _)| *class == self.class) {
            Some((_, class_name)) => format!("{}-0x{:02X}", class_name, self.id),
            None => format!("UBX-0x{:02X}-0x{:02X}", self.class, self.id),
        }
    }
}

impl fmt::Display for MessageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// UBX-NAV-PVT (navigation position velocity time solution)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPvt {
    pub itow: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    /// Bit 0: validDate, bit 1: validTime, bit 2: fullyResolved
    pub valid: u8,
    pub t_acc: u32,
    /// Fraction of second, -1e9..1e9 ns
    pub nano: i32,
    pub fix_type: u8,
    pub flags: u8,
    pub flags2: u8,
    pub num_sv: u8,
    /// Longitude, deg * 1e-7
    pub lon: i32,
    /// Latitude, deg * 1e-7
    pub lat: i32,
    /// Height above ellipsoid, mm
    pub height: i32,
    /// Height above mean sea level, mm
    pub h_msl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
    pub vel_n: i32,
    pub vel_e: i32,
    pub vel_d: i32,
    /// Ground speed, mm/s
    pub g_speed: i32,
    /// Heading of motion, deg * 1e-5
    pub head_mot: i32,
    pub s_acc: u32,
    pub head_acc: u32,
    pub p_dop: u16,
}

impl NavPvt {
    pub const VALID_DATE: u8 = 0x01;
    pub const VALID_TIME: u8 = 0x02;
    pub const FULLY_RESOLVED: u8 = 0x04;
    pub const GNSS_FIX_OK: u8 = 0x01;

    /// True when the receiver flags both date and time as valid
    pub fn has_valid_date_time(&self) -> bool {
        self.valid & (Self::VALID_DATE | Self::VALID_TIME) == Self::VALID_DATE | Self::VALID_TIME
    }

    pub fn gnss_fix_ok(&self) -> bool {
        self.flags & Self::GNSS_FIX_OK != 0
    }
}

/// UBX-NAV-POSLLH (geodetic position solution)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPosllh {
    pub itow: u32,
    pub lon: i32,
    pub lat: i32,
    pub height: i32,
    pub h_msl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
}

/// UBX-MON-VER (receiver and software version)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonVer {
    pub sw_version: String,
    pub hw_version: String,
    pub extensions: Vec<String>,
}

/// Payload of a decoded UBX frame, one variant per supported layout
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UbxMessage {
    NavPvt(NavPvt),
    NavPosllh(NavPosllh),
    MonVer(MonVer),
    /// ACK-ACK / ACK-NAK carrying the acknowledged message
    Ack {
        acknowledged: MessageIdentity,
        accepted: bool,
    },
    /// INF-* text output from the receiver
    Inf(String),
    /// Identity known, no payload layout in the dispatch table
    Unparsed,
    /// Known layout but the payload did not fit it
    Undecodable { reason: String },
}

/// A UBX message with its identity and source offset
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodedMessage {
    pub offset: usize,
    pub identity: MessageIdentity,
    pub message: UbxMessage,
}

impl DecodedMessage {
    pub fn name(&self) -> String {
        self.identity.name()
    }

    pub fn is_undecodable(&self) -> bool {
        matches!(self.message, UbxMessage::Undecodable { .. })
    }
}
