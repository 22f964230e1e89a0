//! Typed single-frame NMEA 2000 messages.
//!
//! Each message knows its PGN, the minimum payload it needs and how to move
//! between its fields and the eight payload bytes. Fields that the sender
//! marked "not available" are `None`.

use crate::n2k::fields::*;
use crate::n2k::frame::{N2kFrame, MAX_FRAME_LEN};

/// PGNs the gateway converts.
pub mod pgn {
    pub const RUDDER: u32 = 127245;
    pub const VESSEL_HEADING: u32 = 127250;
    pub const BOAT_SPEED: u32 = 128259;
    pub const WATER_DEPTH: u32 = 128267;
    pub const WIND_DATA: u32 = 130306;
}

/// A message that fits in one classic CAN frame.
pub trait N2kMessage: Sized {
    const PGN: u32;
    /// Shortest payload the structured parse accepts.
    const MIN_LEN: usize;
    /// Default transmit priority.
    const PRIORITY: u8;

    /// Decode from a payload that is at least `MIN_LEN` bytes long.
    fn decode_fields(data: &[u8]) -> Self;

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]);

    /// Structured parse. `None` if the frame is for another PGN or too short.
    fn parse(frame: &N2kFrame) -> Option<Self> {
        if frame.pgn != Self::PGN || frame.len() < Self::MIN_LEN {
            return None;
        }
        Some(Self::decode_fields(frame.payload()))
    }

    fn to_frame(&self, source: u8) -> N2kFrame {
        let mut buf = [0xFF; MAX_FRAME_LEN];
        self.encode_fields(&mut buf);
        N2kFrame::new(Self::PGN, Self::PRIORITY, source, &buf)
    }
}

// ── 128259 Boat speed ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedWaterReference {
    PaddleWheel,
    PitotTube,
    DopplerLog,
    UltraSound,
    ElectroMagnetic,
    Other(u8),
}

impl SpeedWaterReference {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::PaddleWheel,
            1 => Self::PitotTube,
            2 => Self::DopplerLog,
            3 => Self::UltraSound,
            4 => Self::ElectroMagnetic,
            n => Self::Other(n),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::PaddleWheel => 0,
            Self::PitotTube => 1,
            Self::DopplerLog => 2,
            Self::UltraSound => 3,
            Self::ElectroMagnetic => 4,
            Self::Other(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoatSpeed {
    pub sid: u8,
    /// Speed through water, m/s.
    pub water_referenced: Option<f64>,
    /// Speed over ground, m/s.
    pub ground_referenced: Option<f64>,
    pub reference: SpeedWaterReference,
}

impl N2kMessage for BoatSpeed {
    const PGN: u32 = pgn::BOAT_SPEED;
    const MIN_LEN: usize = 6;
    const PRIORITY: u8 = 2;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            sid: data[0],
            water_referenced: read_u16_fixed(data, 1, RES_CENTI),
            ground_referenced: read_u16_fixed(data, 3, RES_CENTI),
            reference: SpeedWaterReference::from_raw(data[5]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]) {
        buf[0] = self.sid;
        write_u16_fixed(buf, 1, self.water_referenced, RES_CENTI);
        write_u16_fixed(buf, 3, self.ground_referenced, RES_CENTI);
        buf[5] = self.reference.raw();
    }
}

// ── 128267 Water depth ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterDepth {
    pub sid: u8,
    /// Depth below transducer, m.
    pub depth: Option<f64>,
    /// Positive: surface to transducer. Negative: transducer to keel. m.
    pub offset: Option<f64>,
    /// Maximum range scale, m. Older senders leave this byte off.
    pub range: Option<f64>,
}

impl N2kMessage for WaterDepth {
    const PGN: u32 = pgn::WATER_DEPTH;
    const MIN_LEN: usize = 7;
    const PRIORITY: u8 = 3;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            sid: data[0],
            depth: read_u32_fixed(data, 1, RES_CENTI),
            offset: read_i16_fixed(data, 5, RES_MILLI),
            range: read_u8_scaled(data, 7, 10.0),
        }
    }

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]) {
        buf[0] = self.sid;
        write_u32_fixed(buf, 1, self.depth, RES_CENTI);
        write_i16_fixed(buf, 5, self.offset, RES_MILLI);
        write_u8_scaled(buf, 7, self.range, 10.0);
    }
}

// ── 130306 Wind data ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindReference {
    /// Ground wind referenced to true north.
    TrueNorth,
    /// Ground wind referenced to magnetic north.
    Magnetic,
    /// Measured on board, relative to the centerline.
    Apparent,
    /// Ground wind relative to the centerline.
    TrueBoat,
    /// Wind through the water relative to the centerline.
    TrueWater,
    Other(u8),
}

impl WindReference {
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x07 {
            0 => Self::TrueNorth,
            1 => Self::Magnetic,
            2 => Self::Apparent,
            3 => Self::TrueBoat,
            4 => Self::TrueWater,
            n => Self::Other(n),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::TrueNorth => 0,
            Self::Magnetic => 1,
            Self::Apparent => 2,
            Self::TrueBoat => 3,
            Self::TrueWater => 4,
            Self::Other(n) => n & 0x07,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    pub sid: u8,
    /// m/s
    pub speed: Option<f64>,
    /// rad, in [0, 2π) as transmitted
    pub angle: Option<f64>,
    pub reference: WindReference,
}

impl N2kMessage for Wind {
    const PGN: u32 = pgn::WIND_DATA;
    const MIN_LEN: usize = 6;
    const PRIORITY: u8 = 2;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            sid: data[0],
            speed: read_u16_fixed(data, 1, RES_CENTI),
            angle: read_u16_fixed(data, 3, RES_ANGLE),
            reference: WindReference::from_raw(data[5]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]) {
        buf[0] = self.sid;
        write_u16_fixed(buf, 1, self.speed, RES_CENTI);
        write_u16_fixed(buf, 3, self.angle, RES_ANGLE);
        buf[5] = 0xF8 | self.reference.raw();
    }
}

// ── 127245 Rudder ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rudder {
    pub instance: u8,
    /// Raw 3-bit direction order (0 = no order).
    pub direction_order: u8,
    /// rad
    pub angle_order: Option<f64>,
    /// rad, positive to starboard
    pub position: Option<f64>,
}

impl N2kMessage for Rudder {
    const PGN: u32 = pgn::RUDDER;
    const MIN_LEN: usize = 6;
    const PRIORITY: u8 = 2;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            instance: data[0],
            direction_order: data[1] & 0x07,
            angle_order: read_i16_fixed(data, 2, RES_ANGLE),
            position: read_i16_fixed(data, 4, RES_ANGLE),
        }
    }

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]) {
        buf[0] = self.instance;
        buf[1] = 0xF8 | (self.direction_order & 0x07);
        write_i16_fixed(buf, 2, self.angle_order, RES_ANGLE);
        write_i16_fixed(buf, 4, self.position, RES_ANGLE);
    }
}

// ── 127250 Vessel heading ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingReference {
    True,
    Magnetic,
    Error,
    Unavailable,
}

impl HeadingReference {
    pub fn from_raw(raw: u8) -> Self {
        match raw & 0x03 {
            0 => Self::True,
            1 => Self::Magnetic,
            2 => Self::Error,
            _ => Self::Unavailable,
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Self::True => 0,
            Self::Magnetic => 1,
            Self::Error => 2,
            Self::Unavailable => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    pub sid: u8,
    /// rad
    pub heading: Option<f64>,
    /// rad
    pub deviation: Option<f64>,
    /// rad
    pub variation: Option<f64>,
    pub reference: HeadingReference,
}

impl Heading {
    pub fn true_heading(sid: u8, heading: f64) -> Self {
        Self {
            sid,
            heading: Some(heading),
            deviation: None,
            variation: None,
            reference: HeadingReference::True,
        }
    }

    pub fn magnetic(sid: u8, heading: f64, deviation: Option<f64>, variation: Option<f64>) -> Self {
        Self {
            sid,
            heading: Some(heading),
            deviation,
            variation,
            reference: HeadingReference::Magnetic,
        }
    }
}

impl N2kMessage for Heading {
    const PGN: u32 = pgn::VESSEL_HEADING;
    const MIN_LEN: usize = 8;
    const PRIORITY: u8 = 2;

    fn decode_fields(data: &[u8]) -> Self {
        Self {
            sid: data[0],
            heading: read_u16_fixed(data, 1, RES_ANGLE),
            deviation: read_i16_fixed(data, 3, RES_ANGLE),
            variation: read_i16_fixed(data, 5, RES_ANGLE),
            reference: HeadingReference::from_raw(data[7]),
        }
    }

    fn encode_fields(&self, buf: &mut [u8; MAX_FRAME_LEN]) {
        buf[0] = self.sid;
        write_u16_fixed(buf, 1, self.heading, RES_ANGLE);
        write_i16_fixed(buf, 3, self.deviation, RES_ANGLE);
        write_i16_fixed(buf, 5, self.variation, RES_ANGLE);
        buf[7] = 0xFC | self.reference.raw();
    }
}
