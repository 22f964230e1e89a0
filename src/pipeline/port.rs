//! Port descriptors for the node system.
//!
//! Each node declares its ports via a static `PortDescriptor` slice. The
//! graph builder uses them to reject edges between nodes that share no
//! payload kind, and the scheduler uses them to skip payloads a consumer
//! does not accept.

use crate::pipeline::payload::Payload;

/// The kind of payload flowing through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Raw NMEA 2000 frames.
    Frame,
    /// NMEA 0183 sentences.
    Sentence,
    /// Decoded sensor updates.
    Update,
}

impl PortKind {
    pub fn of(payload: &Payload) -> Self {
        match payload {
            Payload::Frame(_) => PortKind::Frame,
            Payload::Sentence(..) => PortKind::Sentence,
            Payload::Update(_) => PortKind::Update,
        }
    }
}

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Static descriptor for a node's port.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    pub kind: PortKind,
}

impl PortDescriptor {
    pub const fn input(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
        }
    }

    pub const fn output(name: &'static str, kind: PortKind) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            kind,
        }
    }
}

pub(crate) fn kinds(ports: &[PortDescriptor], direction: PortDirection) -> Vec<PortKind> {
    ports
        .iter()
        .filter(|p| p.direction == direction)
        .map(|p| p.kind)
        .collect()
}

pub(crate) fn accepts(ports: &[PortDescriptor], kind: PortKind) -> bool {
    ports
        .iter()
        .any(|p| p.direction == PortDirection::Input && p.kind == kind)
}
