//! Rate gate for scheduled nodes.

use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::PortDescriptor;
use std::time::Duration;

/// Runs the inner node's `on_tick` at most once per `interval`.
///
/// The first run happens one full interval after the scheduler starts.
/// After each run the gate reopens `interval` after the tick that ran, not
/// after the previous deadline, so a late tick delays every later run.
/// Payloads received from upstream are passed through ungated.
pub struct Periodic<N> {
    inner: N,
    interval: Duration,
    last_run: Duration,
    runs: u64,
}

impl<N: Node> Periodic<N> {
    pub fn new(inner: N, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_run: Duration::ZERO,
            runs: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How many times the inner node has been ticked.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: Node> Node for Periodic<N> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ports(&self) -> &[PortDescriptor] {
        self.inner.ports()
    }

    fn on_start(&mut self, ctx: &mut NodeContext) {
        self.last_run = ctx.now;
        self.inner.on_start(ctx);
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        if ctx.now.saturating_sub(self.last_run) < self.interval {
            return;
        }
        self.last_run = ctx.now;
        self.runs += 1;
        self.inner.on_tick(ctx);
    }

    fn on_receive(&mut self, payload: &Payload, ctx: &mut NodeContext) {
        self.inner.on_receive(payload, ctx);
    }

    fn on_stop(&mut self) {
        self.inner.on_stop();
    }

    fn status(&self) -> Option<String> {
        self.inner.status()
    }
}
