//! NMEA 2000 support: identifier split, frames, field codecs, the typed
//! single-frame messages the gateway understands and the decoder that turns
//! them into [`SensorUpdate`](crate::model::SensorUpdate)s.

pub mod can_id;
pub mod decoder;
pub mod fields;
pub mod frame;
pub mod messages;

pub use can_id::{CanId, BROADCAST};
pub use decoder::{fold_to_centerline, DecoderStats, ProtocolDecoder};
pub use frame::{N2kFrame, MAX_FRAME_LEN};
pub use messages::{
    pgn, BoatSpeed, Heading, HeadingReference, N2kMessage, Rudder, SpeedWaterReference,
    WaterDepth, Wind, WindReference,
};
