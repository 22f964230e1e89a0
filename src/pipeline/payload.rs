//! The values that travel along graph edges.
//!
//! Every variant is a fixed-size inline value, so emitting one never
//! allocates.

use crate::model::{SensorUpdate, SourceInput};
use crate::n2k::N2kFrame;
use crate::nmea0183::Sentence;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Frame(N2kFrame),
    /// A sentence and the serial line it arrived on.
    Sentence(SourceInput, Sentence),
    Update(SensorUpdate),
}

impl Payload {
    pub fn as_frame(&self) -> Option<&N2kFrame> {
        match self {
            Payload::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&SensorUpdate> {
        match self {
            Payload::Update(update) => Some(update),
            _ => None,
        }
    }
}

impl From<N2kFrame> for Payload {
    fn from(frame: N2kFrame) -> Self {
        Payload::Frame(frame)
    }
}

impl From<SensorUpdate> for Payload {
    fn from(update: SensorUpdate) -> Self {
        Payload::Update(update)
    }
}
