//! Fixed-capacity sensor update, the unit of data the graph moves.
//!
//! `SensorUpdate` is an inline buffer of `Assignment`s. It never touches the
//! heap, so cloning one per consumer on the hot path is a plain memcpy.

use crate::model::quantity::Quantity;
use crate::model::source::Source;
use crate::model::time::Timestamp;
use std::fmt;

/// Maximum number of assignments any single update can hold.
/// The largest conversion (water depth) needs three.
pub const MAX_UPDATE_ENTRIES: usize = 8;

/// One quantity set to one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub quantity: Quantity,
    pub value: f64,
}

impl Default for Assignment {
    fn default() -> Self {
        Self {
            quantity: Quantity::HeadingTrue,
            value: 0.0,
        }
    }
}

/// A timestamped, provenance-tagged, bounded set of quantity assignments.
///
/// An update with no assignments is the canonical "nothing learned" value;
/// sinks must take no action on it.
#[derive(Clone, Copy)]
pub struct SensorUpdate {
    timestamp: Timestamp,
    source: Source,
    entries: [Assignment; MAX_UPDATE_ENTRIES],
    len: u8,
    capacity: u8,
}

impl SensorUpdate {
    /// The canonical empty update.
    pub const fn empty() -> Self {
        Self {
            timestamp: Timestamp::ZERO,
            source: Source {
                input: crate::model::source::SourceInput::Unknown,
                bus: None,
            },
            entries: [Assignment {
                quantity: Quantity::HeadingTrue,
                value: 0.0,
            }; MAX_UPDATE_ENTRIES],
            len: 0,
            capacity: 0,
        }
    }

    /// Create an update that accepts at most `capacity` assignments.
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(
            capacity <= MAX_UPDATE_ENTRIES,
            "declared capacity {} exceeds MAX_UPDATE_ENTRIES",
            capacity
        );
        Self {
            capacity: capacity.min(MAX_UPDATE_ENTRIES) as u8,
            ..Self::empty()
        }
    }

    pub fn new(timestamp: Timestamp, source: Source, capacity: usize) -> Self {
        let mut update = Self::with_capacity(capacity);
        update.timestamp = timestamp;
        update.source = source;
        update
    }

    /// Set a quantity. Replaces the value if the quantity is already present.
    ///
    /// Returns `false` if the declared capacity is exhausted; the assignment
    /// is dropped. That is a wrong capacity at the call site, so debug builds
    /// assert.
    pub fn set(&mut self, quantity: Quantity, value: f64) -> bool {
        if let Some(existing) = self.entries[..self.len as usize]
            .iter_mut()
            .find(|a| a.quantity == quantity)
        {
            existing.value = value;
            return true;
        }
        debug_assert!(
            self.len < self.capacity,
            "SensorUpdate capacity {} exceeded setting {}",
            self.capacity,
            quantity
        );
        if self.len >= self.capacity {
            return false;
        }
        self.entries[self.len as usize] = Assignment { quantity, value };
        self.len += 1;
        true
    }

    /// Value of `quantity`, or `None` if this update did not set it.
    pub fn get(&self, quantity: Quantity) -> Option<f64> {
        self.iter()
            .find(|a| a.quantity == quantity)
            .map(|a| a.value)
    }

    #[inline]
    pub fn contains(&self, quantity: Quantity) -> bool {
        self.get(quantity).is_some()
    }

    /// Number of assignments actually set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    #[inline]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Assignments in the order they were set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries[..self.len as usize].iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Assignment] {
        &self.entries[..self.len as usize]
    }
}

impl Default for SensorUpdate {
    fn default() -> Self {
        Self::empty()
    }
}

/// Empty updates compare equal regardless of stale provenance; otherwise
/// timestamp, source and the live assignments must match.
impl PartialEq for SensorUpdate {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() && other.is_empty() {
            return true;
        }
        self.timestamp == other.timestamp
            && self.source == other.source
            && self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for SensorUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorUpdate")
            .field("timestamp", &self.timestamp)
            .field("source", &self.source)
            .field("entries", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::source::SourceInput;

    #[test]
    fn test_set_and_get() {
        let mut u = SensorUpdate::with_capacity(2);
        assert!(u.is_empty());
        assert!(u.set(Quantity::SpeedThroughWater, 3.2));
        assert!(u.set(Quantity::SpeedOverGround, 3.4));
        assert_eq!(u.len(), 2);
        assert_eq!(u.get(Quantity::SpeedThroughWater), Some(3.2));
        assert_eq!(u.get(Quantity::SpeedOverGround), Some(3.4));
        assert_eq!(u.get(Quantity::HeadingTrue), None);
    }

    #[test]
    fn test_provenance_is_fixed_at_construction() {
        let source = Source::local(SourceInput::Barometer);
        let mut u = SensorUpdate::new(Timestamp::from_millis(7), source, 1);
        u.set(Quantity::OutsidePressure, 101_325.0);
        u.set(Quantity::OutsidePressure, 101_300.0);
        assert_eq!(u.timestamp(), Timestamp::from_millis(7));
        assert_eq!(*u.source(), source);
    }

    #[test]
    fn test_assignments_keep_insertion_order() {
        let mut u = SensorUpdate::with_capacity(3);
        u.set(Quantity::DepthBelowTransducer, 42.0);
        u.set(Quantity::DepthSurfaceToTransducer, 1.3);
        u.set(Quantity::DepthBelowSurface, 43.3);
        let order: Vec<_> = u.iter().map(|a| a.quantity).collect();
        assert_eq!(
            order,
            vec![
                Quantity::DepthBelowTransducer,
                Quantity::DepthSurfaceToTransducer,
                Quantity::DepthBelowSurface
            ]
        );
    }

    #[test]
    fn test_set_same_quantity_replaces() {
        let mut u = SensorUpdate::with_capacity(1);
        u.set(Quantity::RudderAngle, 0.1);
        u.set(Quantity::RudderAngle, -0.2);
        assert_eq!(u.len(), 1);
        assert_eq!(u.get(Quantity::RudderAngle), Some(-0.2));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_capacity_overflow_is_ignored_in_release() {
        let mut u = SensorUpdate::with_capacity(1);
        assert!(u.set(Quantity::HeadingTrue, 1.0));
        assert!(!u.set(Quantity::HeadingMagnetic, 1.0));
        assert_eq!(u.len(), 1);
        assert_eq!(u.get(Quantity::HeadingMagnetic), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "capacity")]
    fn test_capacity_overflow_asserts_in_debug() {
        let mut u = SensorUpdate::with_capacity(1);
        u.set(Quantity::HeadingTrue, 1.0);
        u.set(Quantity::HeadingMagnetic, 1.0);
    }

    #[test]
    fn test_empty_updates_are_equal() {
        let a = SensorUpdate::empty();
        let b = SensorUpdate::new(
            Timestamp::from_millis(5),
            Source::nmea2000(SourceInput::Nmea2000, 128259, 2, 1),
            2,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_provenance_and_timestamp() {
        let src = Source::nmea2000(SourceInput::Nmea2000, 127245, 2, 204);
        let mut u = SensorUpdate::new(Timestamp::from_millis(99), src, 1);
        u.set(Quantity::RudderAngle, 0.05);
        assert_eq!(u.timestamp(), Timestamp::from_millis(99));
        assert_eq!(u.source().bus.unwrap().address, 204);
        assert_eq!(u.capacity(), 1);
    }
}
