//! Hardware boundary.
//!
//! The gateway only ever polls. Drivers own their I/O errors: they log them
//! and report "nothing available" instead of failing the tick.

pub mod candump;
pub mod serial_replay;

pub use candump::CandumpReplay;
pub use serial_replay::SerialReplay;

#[cfg(test)]
use mockall::automock;

/// A received classic CAN frame with a 29-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCanFrame {
    pub id: u32,
    pub len: u8,
    pub data: [u8; 8],
}

impl RawCanFrame {
    pub fn new(id: u32, payload: &[u8]) -> Self {
        let len = payload.len().min(8);
        let mut data = [0u8; 8];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id: id & 0x1FFF_FFFF,
            len: len as u8,
            data,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

#[cfg_attr(test, automock)]
pub trait CanDriver {
    /// Next pending frame, if any.
    fn try_recv(&mut self) -> Option<RawCanFrame>;

    /// True once the driver will never produce another frame. Live buses
    /// never end.
    fn is_exhausted(&self) -> bool {
        false
    }
}

#[cfg_attr(test, automock)]
pub trait SerialPort {
    fn bytes_available(&mut self) -> usize;

    /// Read up to `buf.len()` bytes, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

#[cfg_attr(test, automock)]
pub trait AdcDriver {
    /// Latest reading of `channel` in millivolts, `None` if the channel
    /// could not be sampled.
    fn read_millivolts(&mut self, channel: u8) -> Option<u32>;
}

/// Orientation from the inertial unit, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    /// Roll, positive when heeled to starboard.
    pub heel: f64,
    /// Positive bow up.
    pub pitch: f64,
    /// Compass heading in [0, 2π), `None` without a magnetometer fix.
    pub heading: Option<f64>,
}

#[cfg_attr(test, automock)]
pub trait ImuDriver {
    /// Latest fused attitude, `None` while the sensor is not ready.
    fn read_attitude(&mut self) -> Option<Attitude>;
}

#[cfg_attr(test, automock)]
pub trait BarometerDriver {
    /// Static pressure in pascals.
    fn read_pressure(&mut self) -> Option<f64>;
}

impl<T: CanDriver + ?Sized> CanDriver for Box<T> {
    fn try_recv(&mut self) -> Option<RawCanFrame> {
        (**self).try_recv()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

impl<T: SerialPort + ?Sized> SerialPort for Box<T> {
    fn bytes_available(&mut self) -> usize {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }
}

impl<T: AdcDriver + ?Sized> AdcDriver for Box<T> {
    fn read_millivolts(&mut self, channel: u8) -> Option<u32> {
        (**self).read_millivolts(channel)
    }
}

impl<T: ImuDriver + ?Sized> ImuDriver for Box<T> {
    fn read_attitude(&mut self) -> Option<Attitude> {
        (**self).read_attitude()
    }
}

impl<T: BarometerDriver + ?Sized> BarometerDriver for Box<T> {
    fn read_pressure(&mut self) -> Option<f64> {
        (**self).read_pressure()
    }
}
