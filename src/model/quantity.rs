//! Closed vocabulary of physical quantities the gateway knows about.
//!
//! Every quantity has exactly one unit. Values stored in a
//! [`SensorUpdate`](super::SensorUpdate) are always expressed in that unit,
//! so sinks never need to guess: angles are radians, distances meters,
//! speeds meters per second, pressures pascals and potentials volts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical unit attached to a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Radians,
    Meters,
    MetersPerSecond,
    Pascals,
    Volts,
}

impl Unit {
    /// Short symbol used in logs and display pages.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Radians => "rad",
            Unit::Meters => "m",
            Unit::MetersPerSecond => "m/s",
            Unit::Pascals => "Pa",
            Unit::Volts => "V",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A measurable quantity. The discriminant doubles as a dense table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Quantity {
    HeadingTrue,
    HeadingMagnetic,
    MagneticVariation,
    SpeedThroughWater,
    SpeedOverGround,

    DepthBelowTransducer,
    DepthBelowSurface,
    DepthBelowKeel,
    DepthSurfaceToTransducer,
    DepthTransducerToKeel,

    /// Ground wind speed, paired with a true or magnetic direction.
    WindSpeedOverGround,
    WindDirectionTrue,
    WindDirectionMagnetic,
    WindSpeedApparent,
    /// Positive to starboard, negative to port, in (-π, π].
    WindAngleApparent,
    WindSpeedTrue,
    WindAngleTrueGround,
    WindAngleTrueWater,

    /// Positive is rudder to starboard.
    RudderAngle,

    /// Roll, positive when heeled to starboard.
    Heel,
    /// Positive bow up.
    Pitch,
    OutsidePressure,

    SupplyVoltage,
    Battery1Voltage,
    Battery2Voltage,
    Battery3Voltage,
}

impl Quantity {
    /// Every quantity, in discriminant order.
    pub const ALL: [Quantity; 26] = [
        Quantity::HeadingTrue,
        Quantity::HeadingMagnetic,
        Quantity::MagneticVariation,
        Quantity::SpeedThroughWater,
        Quantity::SpeedOverGround,
        Quantity::DepthBelowTransducer,
        Quantity::DepthBelowSurface,
        Quantity::DepthBelowKeel,
        Quantity::DepthSurfaceToTransducer,
        Quantity::DepthTransducerToKeel,
        Quantity::WindSpeedOverGround,
        Quantity::WindDirectionTrue,
        Quantity::WindDirectionMagnetic,
        Quantity::WindSpeedApparent,
        Quantity::WindAngleApparent,
        Quantity::WindSpeedTrue,
        Quantity::WindAngleTrueGround,
        Quantity::WindAngleTrueWater,
        Quantity::RudderAngle,
        Quantity::Heel,
        Quantity::Pitch,
        Quantity::OutsidePressure,
        Quantity::SupplyVoltage,
        Quantity::Battery1Voltage,
        Quantity::Battery2Voltage,
        Quantity::Battery3Voltage,
    ];

    /// Number of quantities in the vocabulary.
    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Signal K path for this quantity.
    pub fn path(self) -> &'static str {
        match self {
            Quantity::HeadingTrue => "navigation.headingTrue",
            Quantity::HeadingMagnetic => "navigation.headingMagnetic",
            Quantity::MagneticVariation => "navigation.magneticVariation",
            Quantity::SpeedThroughWater => "navigation.speedThroughWater",
            Quantity::SpeedOverGround => "navigation.speedOverGround",
            Quantity::DepthBelowTransducer => "environment.depth.belowTransducer",
            Quantity::DepthBelowSurface => "environment.depth.belowSurface",
            Quantity::DepthBelowKeel => "environment.depth.belowKeel",
            Quantity::DepthSurfaceToTransducer => "environment.depth.surfaceToTransducer",
            Quantity::DepthTransducerToKeel => "environment.depth.transducerToKeel",
            Quantity::WindSpeedOverGround => "environment.wind.speedOverGround",
            Quantity::WindDirectionTrue => "environment.wind.directionTrue",
            Quantity::WindDirectionMagnetic => "environment.wind.directionMagnetic",
            Quantity::WindSpeedApparent => "environment.wind.speedApparent",
            Quantity::WindAngleApparent => "environment.wind.angleApparent",
            Quantity::WindSpeedTrue => "environment.wind.speedTrue",
            Quantity::WindAngleTrueGround => "environment.wind.angleTrueGround",
            Quantity::WindAngleTrueWater => "environment.wind.angleTrueWater",
            Quantity::RudderAngle => "steering.rudderAngle",
            Quantity::Heel => "navigation.attitude.roll",
            Quantity::Pitch => "navigation.attitude.pitch",
            Quantity::OutsidePressure => "environment.outside.pressure",
            Quantity::SupplyVoltage => "electrical.batteries.supply.voltage",
            Quantity::Battery1Voltage => "electrical.batteries.1.voltage",
            Quantity::Battery2Voltage => "electrical.batteries.2.voltage",
            Quantity::Battery3Voltage => "electrical.batteries.3.voltage",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Quantity::HeadingTrue
            | Quantity::HeadingMagnetic
            | Quantity::MagneticVariation
            | Quantity::WindDirectionTrue
            | Quantity::WindDirectionMagnetic
            | Quantity::WindAngleApparent
            | Quantity::WindAngleTrueGround
            | Quantity::WindAngleTrueWater
            | Quantity::RudderAngle
            | Quantity::Heel
            | Quantity::Pitch => Unit::Radians,

            Quantity::SpeedThroughWater
            | Quantity::SpeedOverGround
            | Quantity::WindSpeedOverGround
            | Quantity::WindSpeedApparent
            | Quantity::WindSpeedTrue => Unit::MetersPerSecond,

            Quantity::DepthBelowTransducer
            | Quantity::DepthBelowSurface
            | Quantity::DepthBelowKeel
            | Quantity::DepthSurfaceToTransducer
            | Quantity::DepthTransducerToKeel => Unit::Meters,

            Quantity::OutsidePressure => Unit::Pascals,

            Quantity::SupplyVoltage
            | Quantity::Battery1Voltage
            | Quantity::Battery2Voltage
            | Quantity::Battery3Voltage => Unit::Volts,
        }
    }

    /// Look a quantity up by its Signal K path.
    pub fn from_path(path: &str) -> Option<Quantity> {
        Self::ALL.iter().copied().find(|q| q.path() == path)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, q) in Quantity::ALL.iter().enumerate() {
            assert_eq!(q.index(), i, "{:?} out of order", q);
        }
    }

    #[test]
    fn test_paths_are_unique_and_round_trip() {
        for q in Quantity::ALL {
            assert_eq!(Quantity::from_path(q.path()), Some(q));
        }
        assert_eq!(Quantity::from_path("navigation.nope"), None);
    }

    #[test]
    fn test_units() {
        assert_eq!(Quantity::RudderAngle.unit(), Unit::Radians);
        assert_eq!(Quantity::DepthBelowKeel.unit(), Unit::Meters);
        assert_eq!(Quantity::WindSpeedApparent.unit(), Unit::MetersPerSecond);
        assert_eq!(Quantity::Battery2Voltage.unit().symbol(), "V");
        assert_eq!(Quantity::Heel.unit(), Unit::Radians);
        assert_eq!(Quantity::OutsidePressure.unit().symbol(), "Pa");
    }
}
