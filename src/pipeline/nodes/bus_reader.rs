//! BusReader node: polls a CAN driver and emits NMEA 2000 frames.

use crate::drivers::CanDriver;
use crate::n2k::{CanId, N2kFrame};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::port::{PortDescriptor, PortKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("frames", PortKind::Frame)];

/// Frames drained per tick unless configured otherwise.
pub const DEFAULT_FRAMES_PER_TICK: usize = 32;

pub struct BusReaderNode<D> {
    driver: D,
    frames_per_tick: usize,
    frames: u64,
    /// Cleared once the driver reports it will never deliver again.
    shutdown: Option<Arc<AtomicBool>>,
    exhausted: bool,
}

impl<D: CanDriver> BusReaderNode<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            frames_per_tick: DEFAULT_FRAMES_PER_TICK,
            frames: 0,
            shutdown: None,
            exhausted: false,
        }
    }

    /// Upper bound on frames emitted in one tick, so a busy bus cannot
    /// starve the other scheduled nodes.
    pub fn with_frames_per_tick(mut self, frames_per_tick: usize) -> Self {
        self.frames_per_tick = frames_per_tick.max(1);
        self
    }

    /// Clear `running` when the driver is exhausted.
    pub fn with_shutdown(mut self, running: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(running);
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<D: CanDriver> Node for BusReaderNode<D> {
    fn name(&self) -> &str {
        "BusReader"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        for _ in 0..self.frames_per_tick {
            let Some(raw) = self.driver.try_recv() else {
                break;
            };
            ctx.emit(N2kFrame::from_can(CanId(raw.id), raw.payload()));
            self.frames += 1;
        }

        if !self.exhausted && self.driver.is_exhausted() {
            self.exhausted = true;
            tracing::info!("CAN input exhausted after {} frames", self.frames);
            if let Some(running) = &self.shutdown {
                running.store(false, Ordering::Relaxed);
            }
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("frames={}", self.frames))
    }
}
