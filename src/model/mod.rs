//! Provenance-tagged sensor data model.
//!
//! A [`SensorUpdate`] is what one decoded observation looks like: a
//! [`Timestamp`], a [`Source`] and a bounded list of [`Quantity`] values in
//! fixed units.

pub mod delta;
pub mod quantity;
pub mod source;
pub mod time;
pub mod update;

pub use delta::{Delta, DeltaSource, DeltaUpdate, PathValue};
pub use quantity::{Quantity, Unit};
pub use source::{BusOrigin, Source, SourceInput};
pub use time::Timestamp;
pub use update::{Assignment, SensorUpdate, MAX_UPDATE_ENTRIES};
