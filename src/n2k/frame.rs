//! In-memory representation of a single NMEA 2000 frame as handed over by
//! the bus driver.

use crate::n2k::can_id::{CanId, BROADCAST};
use std::fmt;

/// Classic CAN frames carry at most eight payload bytes.
pub const MAX_FRAME_LEN: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct N2kFrame {
    pub pgn: u32,
    pub priority: u8,
    /// Originating bus address.
    pub source: u8,
    pub destination: u8,
    data: [u8; MAX_FRAME_LEN],
    len: u8,
}

impl N2kFrame {
    /// Build a broadcast frame. Payload bytes past [`MAX_FRAME_LEN`] are dropped.
    pub fn new(pgn: u32, priority: u8, source: u8, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_FRAME_LEN);
        let mut data = [0xFF; MAX_FRAME_LEN];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            pgn,
            priority,
            source,
            destination: BROADCAST,
            data,
            len: len as u8,
        }
    }

    /// Split a raw CAN identifier and attach the payload.
    pub fn from_can(id: CanId, payload: &[u8]) -> Self {
        let mut frame = Self::new(id.pgn(), id.priority(), id.source(), payload);
        frame.destination = id.destination();
        frame
    }

    pub fn can_id(&self) -> CanId {
        CanId::with_destination(self.priority, self.pgn, self.source, self.destination)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for N2kFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N2kFrame(pgn={} prio={} src={} [",
            self.pgn, self.priority, self.source
        )?;
        for (i, b) in self.payload().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        f.write_str("])")
    }
}
