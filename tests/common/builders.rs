//! Raw NMEA 2000 frame builders.
//!
//! Payloads are assembled byte by byte so the decoder is checked against the
//! wire layout rather than against the crate's own encoders.

use marine_gateway::n2k::{pgn, N2kFrame};

/// Bus address used by the builders.
pub const SOURCE: u8 = 0x23;

fn le16(raw: u16) -> [u8; 2] {
    raw.to_le_bytes()
}

pub fn boat_speed(sid: u8, water_raw: u16, ground_raw: u16) -> N2kFrame {
    let w = le16(water_raw);
    let g = le16(ground_raw);
    N2kFrame::new(pgn::BOAT_SPEED, 2, SOURCE, &[sid, w[0], w[1], g[0], g[1], 0x00, 0xFF, 0xFF])
}

pub fn water_depth(sid: u8, depth_raw: u32, offset_raw: i16) -> N2kFrame {
    let d = depth_raw.to_le_bytes();
    let o = offset_raw.to_le_bytes();
    N2kFrame::new(pgn::WATER_DEPTH, 3, SOURCE, &[sid, d[0], d[1], d[2], d[3], o[0], o[1], 0xFF])
}

pub fn wind(sid: u8, speed_raw: u16, angle_raw: u16, reference: u8) -> N2kFrame {
    let s = le16(speed_raw);
    let a = le16(angle_raw);
    N2kFrame::new(
        pgn::WIND_DATA,
        2,
        SOURCE,
        &[sid, s[0], s[1], a[0], a[1], 0xF8 | reference, 0xFF, 0xFF],
    )
}

pub fn rudder(instance: u8, position_raw: i16) -> N2kFrame {
    let p = position_raw.to_le_bytes();
    N2kFrame::new(pgn::RUDDER, 2, SOURCE, &[instance, 0xF8, 0xFF, 0x7F, p[0], p[1], 0xFF, 0xFF])
}

pub fn heading(sid: u8, heading_raw: u16, variation_raw: i16, reference: u8) -> N2kFrame {
    let h = le16(heading_raw);
    let v = variation_raw.to_le_bytes();
    N2kFrame::new(
        pgn::VESSEL_HEADING,
        2,
        SOURCE,
        &[sid, h[0], h[1], 0xFF, 0x7F, v[0], v[1], 0xFC | reference],
    )
}

/// candump `-L` line carrying `frame`.
pub fn candump_line(seconds: f64, frame: &N2kFrame) -> String {
    let data: String = frame.payload().iter().map(|b| format!("{:02X}", b)).collect();
    format!("({:.6}) can0 {:08X}#{}", seconds, frame.can_id().0, data)
}
