//! Provenance of a sensor update.
//!
//! Downstream consumers use this for conflict resolution and logging. The
//! graph itself never routes on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical channel data arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceInput {
    #[default]
    Unknown,
    Nmea2000,
    /// Serial NMEA 0183 line, numbered from 1.
    Nmea0183(u8),
    /// Serial line configured for Seatalk (9-bit) framing.
    Seatalk(u8),
    Adc,
    Imu,
    Barometer,
}

impl SourceInput {
    /// Label used in Signal K `$source` strings and log records.
    pub fn label(self) -> String {
        match self {
            SourceInput::Unknown => "unknown".to_string(),
            SourceInput::Nmea2000 => "nmea2000".to_string(),
            SourceInput::Nmea0183(n) => format!("nmea0183-{}", n),
            SourceInput::Seatalk(n) => format!("seatalk-{}", n),
            SourceInput::Adc => "adc".to_string(),
            SourceInput::Imu => "imu".to_string(),
            SourceInput::Barometer => "barometer".to_string(),
        }
    }
}

impl fmt::Display for SourceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Bus-level identification for NMEA 2000 sourced data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusOrigin {
    pub pgn: u32,
    pub priority: u8,
    pub address: u8,
}

/// Where an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Source {
    pub input: SourceInput,
    /// Present only for bus-sourced data.
    pub bus: Option<BusOrigin>,
}

impl Source {
    pub fn nmea2000(input: SourceInput, pgn: u32, priority: u8, address: u8) -> Self {
        Self {
            input,
            bus: Some(BusOrigin {
                pgn,
                priority,
                address,
            }),
        }
    }

    /// Source for data produced on-board (ADC, IMU...) rather than on a bus.
    pub fn local(input: SourceInput) -> Self {
        Self { input, bus: None }
    }

    /// Signal K style label, e.g. `nmea2000.42` for bus address 42.
    pub fn label(&self) -> String {
        match self.bus {
            Some(bus) => format!("{}.{}", self.input, bus.address),
            None => self.input.label(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bus {
            Some(bus) => write!(
                f,
                "{} pgn={} prio={} src={}",
                self.input, bus.pgn, bus.priority, bus.address
            ),
            None => write!(f, "{}", self.input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nmea2000_source() {
        let s = Source::nmea2000(SourceInput::Nmea2000, 127250, 2, 35);
        let bus = s.bus.unwrap();
        assert_eq!(bus.pgn, 127250);
        assert_eq!(bus.priority, 2);
        assert_eq!(bus.address, 35);
        assert_eq!(s.label(), "nmea2000.35");
    }

    #[test]
    fn test_local_source_has_no_bus() {
        let s = Source::local(SourceInput::Adc);
        assert!(s.bus.is_none());
        assert_eq!(s.label(), "adc");
        assert_eq!(SourceInput::Nmea0183(2).label(), "nmea0183-2");
    }
}
