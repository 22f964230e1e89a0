//! 29-bit ISO 11783 / NMEA 2000 CAN identifier.
//!
//! ```text
//!  28..26   25   24   23..16   15..8    7..0
//! priority  R    DP     PF       PS    source
//! ```
//!
//! When PF < 240 (PDU1) the PS byte is a destination address and is not part
//! of the PGN.

use std::fmt;

/// Global (broadcast) destination address.
pub const BROADCAST: u8 = 0xFF;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanId(pub u32);

impl CanId {
    const MASK: u32 = 0x1FFF_FFFF;

    /// Build an identifier for a broadcast message.
    pub fn new(priority: u8, pgn: u32, source: u8) -> Self {
        Self::with_destination(priority, pgn, source, BROADCAST)
    }

    pub fn with_destination(priority: u8, pgn: u32, source: u8, destination: u8) -> Self {
        let pf = (pgn >> 8) & 0xFF;
        let mut id = ((priority as u32 & 0x7) << 26) | ((pgn & 0x3_FFFF) << 8) | source as u32;
        if pf < 240 {
            id = (id & !0xFF00) | ((destination as u32) << 8);
        }
        CanId(id & Self::MASK)
    }

    #[inline]
    pub const fn priority(self) -> u8 {
        ((self.0 >> 26) & 0x7) as u8
    }

    #[inline]
    pub const fn source(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn pdu_format(self) -> u32 {
        (self.0 >> 16) & 0xFF
    }

    #[inline]
    pub const fn is_pdu1(self) -> bool {
        self.pdu_format() < 240
    }

    pub const fn pgn(self) -> u32 {
        let pgn = (self.0 >> 8) & 0x3_FFFF;
        if self.is_pdu1() {
            pgn & !0xFF
        } else {
            pgn
        }
    }

    /// Destination address; PDU2 messages are always broadcast.
    pub const fn destination(self) -> u8 {
        if self.is_pdu1() {
            (self.0 >> 8) as u8
        } else {
            BROADCAST
        }
    }
}

impl fmt::Debug for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CanId(0x{:08X} prio={} pgn={} src={} dst={})",
            self.0,
            self.priority(),
            self.pgn(),
            self.source(),
            self.destination()
        )
    }
}
