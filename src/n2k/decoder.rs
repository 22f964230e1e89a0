//! NMEA 2000 frame → [`SensorUpdate`] conversion.
//!
//! Dispatch goes through a PGN table built once in [`ProtocolDecoder::new`].
//! Each conversion runs the structured parse of its message type and then
//! maps fields to quantities, applying the sign and reference rules of that
//! message. Anything the decoder cannot use yields the canonical empty
//! update and a debug line naming the PGN; it never returns an error.

use crate::model::{Quantity, SensorUpdate, Source, SourceInput, Timestamp};
use crate::n2k::frame::N2kFrame;
use crate::n2k::messages::{
    BoatSpeed, Heading, HeadingReference, N2kMessage, Rudder, WaterDepth, Wind, WindReference,
};
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// Why a known PGN produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    /// Wrong PGN or payload shorter than the message layout.
    Malformed,
    /// A field the conversion cannot do without was "not available" or out
    /// of range.
    MissingField(&'static str),
}

type ConversionFn = fn(&N2kFrame, &mut SensorUpdate) -> Result<(), Rejection>;

/// Counters since the decoder was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames that produced at least one assignment.
    pub decoded: u64,
    /// Frames whose PGN has no conversion.
    pub unknown: u64,
    /// Frames of a known PGN that produced nothing.
    pub rejected: u64,
}

pub struct ProtocolDecoder {
    conversions: HashMap<u32, (usize, ConversionFn)>,
    last: SensorUpdate,
    stats: DecoderStats,
}

impl ProtocolDecoder {
    pub fn new() -> Self {
        let mut conversions: HashMap<u32, (usize, ConversionFn)> = HashMap::new();
        conversions.insert(BoatSpeed::PGN, (2, convert_boat_speed));
        conversions.insert(WaterDepth::PGN, (3, convert_water_depth));
        conversions.insert(Wind::PGN, (2, convert_wind));
        conversions.insert(Rudder::PGN, (1, convert_rudder));
        conversions.insert(Heading::PGN, (2, convert_heading));

        Self {
            conversions,
            last: SensorUpdate::empty(),
            stats: DecoderStats::default(),
        }
    }

    /// Decode one frame received on `input`.
    ///
    /// The returned update lives in the decoder and is overwritten by the
    /// next call. Consumers that need to keep it must copy it.
    pub fn decode(
        &mut self,
        input: SourceInput,
        frame: &N2kFrame,
        timestamp: Timestamp,
    ) -> &SensorUpdate {
        let Some(&(capacity, convert)) = self.conversions.get(&frame.pgn) else {
            debug!("No known conversion for PGN {}", frame.pgn);
            self.stats.unknown += 1;
            self.last = SensorUpdate::empty();
            return &self.last;
        };

        let source = Source::nmea2000(input, frame.pgn, frame.priority, frame.source);
        let mut update = SensorUpdate::new(timestamp, source, capacity);

        match convert(frame, &mut update) {
            Ok(()) if !update.is_empty() => {
                self.stats.decoded += 1;
                self.last = update;
            }
            Ok(()) => {
                debug!("NMEA 2000 frame with PGN {} carried no usable data", frame.pgn);
                self.stats.rejected += 1;
                self.last = SensorUpdate::empty();
            }
            Err(Rejection::Malformed) => {
                debug!(
                    "Unable to parse NMEA 2000 frame with PGN {} ({} bytes)",
                    frame.pgn,
                    frame.len()
                );
                self.stats.rejected += 1;
                self.last = SensorUpdate::empty();
            }
            Err(Rejection::MissingField(field)) => {
                debug!(
                    "NMEA 2000 frame with PGN {} has no usable {}",
                    frame.pgn, field
                );
                self.stats.rejected += 1;
                self.last = SensorUpdate::empty();
            }
        }
        &self.last
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Supported PGNs in ascending order.
    pub fn supported_pgns(&self) -> Vec<u32> {
        let mut pgns: Vec<u32> = self.conversions.keys().copied().collect();
        pgns.sort_unstable();
        pgns
    }
}

impl Default for ProtocolDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an angle in [0, 2π) relative to the bow onto (-π, π], negative to
/// port.
pub fn fold_to_centerline(angle: f64) -> f64 {
    if angle > PI {
        angle - TAU
    } else {
        angle
    }
}

fn convert_boat_speed(frame: &N2kFrame, update: &mut SensorUpdate) -> Result<(), Rejection> {
    let msg = BoatSpeed::parse(frame).ok_or(Rejection::Malformed)?;
    if let Some(stw) = msg.water_referenced {
        update.set(Quantity::SpeedThroughWater, stw);
    }
    if let Some(sog) = msg.ground_referenced {
        update.set(Quantity::SpeedOverGround, sog);
    }
    Ok(())
}

fn convert_water_depth(frame: &N2kFrame, update: &mut SensorUpdate) -> Result<(), Rejection> {
    let msg = WaterDepth::parse(frame).ok_or(Rejection::Malformed)?;
    let depth = msg.depth.ok_or(Rejection::MissingField("depth"))?;
    let offset = msg.offset.unwrap_or(0.0);

    update.set(Quantity::DepthBelowTransducer, depth);
    if offset < 0.0 {
        update.set(Quantity::DepthTransducerToKeel, -offset);
        update.set(Quantity::DepthBelowKeel, depth + offset);
    } else if offset > 0.0 {
        update.set(Quantity::DepthSurfaceToTransducer, offset);
        update.set(Quantity::DepthBelowSurface, depth + offset);
    }
    Ok(())
}

fn convert_wind(frame: &N2kFrame, update: &mut SensorUpdate) -> Result<(), Rejection> {
    let msg = Wind::parse(frame).ok_or(Rejection::Malformed)?;
    let speed = msg.speed.ok_or(Rejection::MissingField("wind speed"))?;
    let angle = msg.angle.ok_or(Rejection::MissingField("wind angle"))?;

    let (speed_q, angle_q, angle) = match msg.reference {
        WindReference::TrueNorth => (
            Quantity::WindSpeedOverGround,
            Quantity::WindDirectionTrue,
            angle,
        ),
        WindReference::Magnetic => (
            Quantity::WindSpeedOverGround,
            Quantity::WindDirectionMagnetic,
            angle,
        ),
        WindReference::Apparent => (
            Quantity::WindSpeedApparent,
            Quantity::WindAngleApparent,
            fold_to_centerline(angle),
        ),
        WindReference::TrueBoat => (
            Quantity::WindSpeedTrue,
            Quantity::WindAngleTrueGround,
            fold_to_centerline(angle),
        ),
        WindReference::TrueWater => (
            Quantity::WindSpeedTrue,
            Quantity::WindAngleTrueWater,
            fold_to_centerline(angle),
        ),
        WindReference::Other(_) => return Err(Rejection::MissingField("wind reference")),
    };
    update.set(speed_q, speed);
    update.set(angle_q, angle);
    Ok(())
}

fn convert_rudder(frame: &N2kFrame, update: &mut SensorUpdate) -> Result<(), Rejection> {
    let msg = Rudder::parse(frame).ok_or(Rejection::Malformed)?;
    let position = msg.position.ok_or(Rejection::MissingField("rudder position"))?;
    update.set(Quantity::RudderAngle, position);
    Ok(())
}

fn convert_heading(frame: &N2kFrame, update: &mut SensorUpdate) -> Result<(), Rejection> {
    let msg = Heading::parse(frame).ok_or(Rejection::Malformed)?;
    let heading = msg
        .heading
        .filter(|h| (0.0..TAU).contains(h))
        .ok_or(Rejection::MissingField("heading"))?;

    match msg.reference {
        HeadingReference::True => {
            update.set(Quantity::HeadingTrue, heading);
        }
        HeadingReference::Magnetic => {
            update.set(Quantity::HeadingMagnetic, heading);
            if let Some(variation) = msg.variation {
                update.set(Quantity::MagneticVariation, variation);
            }
        }
        HeadingReference::Error | HeadingReference::Unavailable => {
            return Err(Rejection::MissingField("heading reference"));
        }
    }
    Ok(())
}
