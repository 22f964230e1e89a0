//! Node abstraction for the graph.
//!
//! A node is a producer (it has output ports and emits from `on_tick` or
//! `on_receive`), a consumer (it has input ports and handles `on_receive`),
//! or both. The scheduler owns every node in an arena and calls the hooks;
//! nodes never see each other.

use crate::model::Timestamp;
use crate::pipeline::payload::Payload;
use crate::pipeline::port::PortDescriptor;
use std::time::Duration;

/// Time as seen by every node during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    /// Time since the scheduler started.
    pub now: Duration,
    /// Wall-clock time of this tick.
    pub timestamp: Timestamp,
    /// Monotonic tick counter.
    pub tick: u64,
}

/// Context passed to node hooks.
pub struct NodeContext<'a> {
    pub now: Duration,
    pub timestamp: Timestamp,
    pub tick: u64,
    outbox: &'a mut Vec<Payload>,
}

impl<'a> NodeContext<'a> {
    pub fn new(clock: Clock, outbox: &'a mut Vec<Payload>) -> Self {
        Self {
            now: clock.now,
            timestamp: clock.timestamp,
            tick: clock.tick,
            outbox,
        }
    }

    /// Queue a payload for every consumer connected to this node. Delivery
    /// happens as soon as the current hook returns.
    #[inline]
    pub fn emit(&mut self, payload: impl Into<Payload>) {
        self.outbox.push(payload.into());
    }

    pub fn emitted(&self) -> usize {
        self.outbox.len()
    }
}

pub trait Node {
    /// Human-readable name, used in logs and errors.
    fn name(&self) -> &str;

    fn ports(&self) -> &[PortDescriptor];

    /// Called once before the first tick.
    fn on_start(&mut self, _ctx: &mut NodeContext) {}

    /// Called once per tick for scheduled nodes.
    fn on_tick(&mut self, _ctx: &mut NodeContext) {}

    /// Called for every payload an upstream node emits.
    fn on_receive(&mut self, _payload: &Payload, _ctx: &mut NodeContext) {}

    /// Called once when the scheduler stops.
    fn on_stop(&mut self) {}

    /// One-line counters for the periodic stats log.
    fn status(&self) -> Option<String> {
        None
    }
}

impl<N: Node + ?Sized> Node for Box<N> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn ports(&self) -> &[PortDescriptor] {
        (**self).ports()
    }

    fn on_start(&mut self, ctx: &mut NodeContext) {
        (**self).on_start(ctx)
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        (**self).on_tick(ctx)
    }

    fn on_receive(&mut self, payload: &Payload, ctx: &mut NodeContext) {
        (**self).on_receive(payload, ctx)
    }

    fn on_stop(&mut self) {
        (**self).on_stop()
    }

    fn status(&self) -> Option<String> {
        (**self).status()
    }
}
