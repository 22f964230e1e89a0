//! Decoder behavior on hand-assembled NMEA 2000 frames.

mod common;

use common::builders::{self, SOURCE};
use common::{assert_float_eq, test_timestamp};
use marine_gateway::model::{BusOrigin, Quantity, SourceInput};
use marine_gateway::n2k::{pgn, N2kFrame, ProtocolDecoder};
use proptest::prelude::*;

fn decode(frame: &N2kFrame) -> marine_gateway::SensorUpdate {
    *ProtocolDecoder::new().decode(SourceInput::Nmea2000, frame, test_timestamp())
}

#[test]
fn test_unknown_pgn_yields_nothing() {
    // 129025 position rapid update is not converted.
    let frame = N2kFrame::new(129025, 2, SOURCE, &[0x10, 0x27, 0, 0, 0x20, 0x4E, 0, 0]);
    let mut decoder = ProtocolDecoder::new();
    let update = decoder.decode(SourceInput::Nmea2000, &frame, test_timestamp());
    assert_eq!(update.len(), 0);
    assert_eq!(decoder.stats().unknown, 1);
}

#[test]
fn test_boat_speed_sets_both_speeds() {
    let update = decode(&builders::boat_speed(7, 340, 355));
    assert_eq!(update.len(), 2);
    assert_eq!(update.get(Quantity::SpeedThroughWater), Some(3.4));
    assert_eq!(update.get(Quantity::SpeedOverGround), Some(3.55));
}

#[test]
fn test_boat_speed_fields_are_independent() {
    let ground_only = decode(&builders::boat_speed(7, 0xFFFF, 355));
    assert_eq!(ground_only.len(), 1);
    assert_eq!(ground_only.get(Quantity::SpeedThroughWater), None);
    assert_eq!(ground_only.get(Quantity::SpeedOverGround), Some(3.55));

    let water_only = decode(&builders::boat_speed(7, 340, 0xFFFF));
    assert_eq!(water_only.len(), 1);
    assert_eq!(water_only.get(Quantity::SpeedThroughWater), Some(3.4));
    assert_eq!(water_only.get(Quantity::SpeedOverGround), None);
}

#[test]
fn test_depth_without_offset() {
    let update = decode(&builders::water_depth(1, 4200, 0x7FFF));
    assert_eq!(update.len(), 1);
    assert_eq!(update.get(Quantity::DepthBelowTransducer), Some(42.0));
}

#[test]
fn test_depth_with_positive_offset_is_below_surface() {
    let update = decode(&builders::water_depth(1, 4200, 1300));
    assert_eq!(update.len(), 3);
    assert_eq!(update.get(Quantity::DepthBelowTransducer), Some(42.0));
    assert_eq!(update.get(Quantity::DepthSurfaceToTransducer), Some(1.3));
    assert_float_eq(update.get(Quantity::DepthBelowSurface).unwrap(), 43.3, 1e-9);
    assert!(!update.contains(Quantity::DepthBelowKeel));
}

#[test]
fn test_depth_with_negative_offset_is_below_keel() {
    let update = decode(&builders::water_depth(1, 4200, -1200));
    assert_eq!(update.len(), 3);
    assert_eq!(update.get(Quantity::DepthTransducerToKeel), Some(1.2));
    assert_float_eq(update.get(Quantity::DepthBelowKeel).unwrap(), 40.8, 1e-9);
    assert!(!update.contains(Quantity::DepthBelowSurface));
}

#[test]
fn test_depth_not_available_is_rejected() {
    let update = decode(&builders::water_depth(1, u32::MAX, 0));
    assert!(update.is_empty());
}

#[test]
fn test_true_heading() {
    let update = decode(&builders::heading(3, 31416, 0x7FFF, 0));
    assert_eq!(update.len(), 1);
    assert_eq!(update.get(Quantity::HeadingTrue), Some(3.1416));
}

#[test]
fn test_true_heading_ignores_variation() {
    let update = decode(&builders::heading(3, 31416, 140, 0));
    assert_eq!(update.len(), 1);
    assert_eq!(update.get(Quantity::HeadingTrue), Some(3.1416));
    assert_eq!(update.get(Quantity::MagneticVariation), None);
}

#[test]
fn test_magnetic_heading_without_variation() {
    let update = decode(&builders::heading(3, 7898, 0x7FFF, 1));
    assert_eq!(update.len(), 1);
    assert_eq!(update.get(Quantity::HeadingMagnetic), Some(0.7898));
    assert!(!update.contains(Quantity::MagneticVariation));
}

#[test]
fn test_magnetic_heading_with_variation() {
    let update = decode(&builders::heading(3, 7898, 140, 1));
    assert_eq!(update.len(), 2);
    assert_eq!(update.get(Quantity::HeadingMagnetic), Some(0.7898));
    assert_eq!(update.get(Quantity::MagneticVariation), Some(0.014));
}

#[test]
fn test_heading_out_of_range_or_unreferenced_is_rejected() {
    // 6.2832 rad is past a full turn.
    assert!(decode(&builders::heading(3, 62832, 0x7FFF, 0)).is_empty());
    assert!(decode(&builders::heading(3, 7898, 0x7FFF, 2)).is_empty());
    assert!(decode(&builders::heading(3, 7898, 0x7FFF, 3)).is_empty());
}

#[test]
fn test_rudder_to_port() {
    // -3.6 degrees
    let update = decode(&builders::rudder(0, -628));
    assert_eq!(update.len(), 1);
    assert_eq!(update.get(Quantity::RudderAngle), Some(-0.0628));
}

#[test]
fn test_apparent_wind() {
    // 12.4 m/s at 29.8 degrees
    let update = decode(&builders::wind(0, 1240, 5201, 2));
    assert_eq!(update.len(), 2);
    assert_eq!(update.get(Quantity::WindSpeedApparent), Some(12.4));
    assert_eq!(update.get(Quantity::WindAngleApparent), Some(0.5201));
}

#[test]
fn test_apparent_wind_past_stern_folds_to_port() {
    // 200 degrees
    let update = decode(&builders::wind(0, 800, 34907, 2));
    assert_float_eq(update.get(Quantity::WindAngleApparent).unwrap(), -2.79249, 1e-3);
}

#[test]
fn test_apparent_wind_up_to_half_turn_is_not_folded() {
    // 3.1415 rad is just short of π, 3.1416 just past it.
    let starboard = decode(&builders::wind(0, 800, 31415, 2));
    assert_eq!(starboard.get(Quantity::WindAngleApparent), Some(3.1415));

    let port = decode(&builders::wind(0, 800, 31416, 2));
    let folded = port.get(Quantity::WindAngleApparent).unwrap();
    assert!(folded < 0.0);
    assert_float_eq(folded, 3.1416 - std::f64::consts::TAU, 1e-9);
}

#[test]
fn test_wind_needs_both_speed_and_angle() {
    assert!(decode(&builders::wind(0, 0xFFFF, 5201, 2)).is_empty());
    assert!(decode(&builders::wind(0, 1240, 0xFFFF, 2)).is_empty());
    assert!(decode(&builders::wind(0, 0xFFFF, 5201, 0)).is_empty());
}

#[test]
fn test_ground_wind_is_not_folded() {
    let update = decode(&builders::wind(0, 800, 34907, 0));
    assert_eq!(update.get(Quantity::WindSpeedOverGround), Some(8.0));
    assert_eq!(update.get(Quantity::WindDirectionTrue), Some(3.4907));
}

#[test]
fn test_true_wind_references() {
    let boat = decode(&builders::wind(0, 600, 1000, 3));
    assert_eq!(boat.get(Quantity::WindSpeedTrue), Some(6.0));
    assert_eq!(boat.get(Quantity::WindAngleTrueGround), Some(0.1));

    let water = decode(&builders::wind(0, 600, 1000, 4));
    assert_eq!(water.get(Quantity::WindAngleTrueWater), Some(0.1));
}

#[test]
fn test_unknown_wind_reference_is_rejected() {
    assert!(decode(&builders::wind(0, 600, 1000, 6)).is_empty());
}

#[test]
fn test_truncated_frame_is_rejected() {
    let frame = N2kFrame::new(pgn::WIND_DATA, 2, SOURCE, &[0, 0xD8, 0x04]);
    let mut decoder = ProtocolDecoder::new();
    assert!(decoder
        .decode(SourceInput::Nmea2000, &frame, test_timestamp())
        .is_empty());
    assert_eq!(decoder.stats().rejected, 1);
}

#[test]
fn test_provenance_and_timestamp() {
    let update = decode(&builders::rudder(0, 100));
    assert_eq!(update.timestamp(), test_timestamp());
    assert_eq!(update.source().input, SourceInput::Nmea2000);
    assert_eq!(
        update.source().bus,
        Some(BusOrigin {
            pgn: pgn::RUDDER,
            priority: 2,
            address: SOURCE,
        })
    );
}

#[test]
fn test_independent_decoders_agree() {
    let frames = [
        builders::boat_speed(1, 512, 498),
        builders::water_depth(2, 1234, -400),
        builders::wind(3, 1240, 5201, 2),
        builders::rudder(0, -628),
        builders::heading(4, 7898, 140, 1),
    ];
    let mut a = ProtocolDecoder::new();
    let mut b = ProtocolDecoder::new();
    for frame in &frames {
        let ua = *a.decode(SourceInput::Nmea2000, frame, test_timestamp());
        let ub = *b.decode(SourceInput::Nmea2000, frame, test_timestamp());
        assert_eq!(ua, ub);
        assert!(!ua.is_empty());
    }
    assert_eq!(a.stats(), b.stats());
}

fn known_pgn() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![
        pgn::RUDDER,
        pgn::VESSEL_HEADING,
        pgn::BOAT_SPEED,
        pgn::WATER_DEPTH,
        pgn::WIND_DATA,
        129025,
    ])
}

proptest! {
    #[test]
    fn prop_arbitrary_payload_never_panics(
        pgn in known_pgn(),
        payload in prop::collection::vec(any::<u8>(), 0..=8),
    ) {
        let frame = N2kFrame::new(pgn, 2, SOURCE, &payload);
        let mut decoder = ProtocolDecoder::new();
        let update = *decoder.decode(SourceInput::Nmea2000, &frame, test_timestamp());

        prop_assert!(update.len() <= update.capacity());
        for a in update.iter() {
            prop_assert!(a.value.is_finite());
        }
        let stats = decoder.stats();
        prop_assert_eq!(stats.decoded + stats.unknown + stats.rejected, 1);
    }

    #[test]
    fn prop_decode_is_idempotent(
        pgn in known_pgn(),
        payload in prop::collection::vec(any::<u8>(), 0..=8),
    ) {
        let frame = N2kFrame::new(pgn, 2, SOURCE, &payload);
        let mut decoder = ProtocolDecoder::new();
        let first = *decoder.decode(SourceInput::Nmea2000, &frame, test_timestamp());
        let second = *decoder.decode(SourceInput::Nmea2000, &frame, test_timestamp());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_folded_wind_angle_is_within_half_turn(angle_raw in 0u16..62832) {
        let update = decode(&builders::wind(0, 500, angle_raw, 2));
        let angle = update.get(Quantity::WindAngleApparent).unwrap();
        prop_assert!(angle > -std::f64::consts::PI && angle <= std::f64::consts::PI);
    }
}
