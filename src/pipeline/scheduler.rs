//! Cooperative tick loop.
//!
//! # Ordering
//!
//! Everything runs on the calling thread, one hook at a time, and each hook
//! runs to completion. Within one tick:
//!
//! 1. Top-level nodes are ticked in the order they were scheduled, each
//!    exactly once.
//! 2. A payload emitted by a node is delivered to that node's consumers in
//!    edge-registration order before the emitting tick (or receive) returns
//!    to the scheduler.
//! 3. Delivery is depth first: if a consumer emits while handling a payload,
//!    its own consumers see that emission before the next sibling consumer
//!    sees the original payload.
//!
//! A consumer fed by several producers therefore sees their payloads in the
//! order the producers were scheduled. Topology is fixed once the scheduler
//! exists.

use crate::model::Timestamp;
use crate::pipeline::graph::Edge;
use crate::pipeline::id::NodeId;
use crate::pipeline::node::{Clock, Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{accepts, PortKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counters kept by the scheduler for every node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Times `on_tick` was called.
    pub ticks: u64,
    /// Payloads handed to `on_receive`.
    pub received: u64,
    /// Payloads the node emitted.
    pub emitted: u64,
}

/// A slot holding a node and its counters.
pub struct NodeSlot {
    pub node: Box<dyn Node>,
    pub stats: NodeStats,
}

impl NodeSlot {
    pub fn new(node: Box<dyn Node>) -> Self {
        Self {
            node,
            stats: NodeStats::default(),
        }
    }
}

enum Hook<'p> {
    Start,
    Tick,
    Receive(&'p Payload),
}

pub struct Scheduler {
    nodes: Vec<NodeSlot>,
    /// Consumers of each node, in edge-registration order.
    consumers: Vec<Vec<NodeId>>,
    edge_count: usize,
    schedule: Vec<NodeId>,
    /// One reusable outbox per delivery depth.
    outboxes: Vec<Vec<Payload>>,
    tick: u64,
    tick_rate_hz: u32,
    epoch: Timestamp,
    started: bool,
    stopped: bool,
    stats_interval: Option<Duration>,
    last_stats: Duration,
    last_tick_time: Option<Instant>,
}

impl Scheduler {
    pub(crate) fn new(
        nodes: Vec<NodeSlot>,
        edges: &[Edge],
        schedule: Vec<NodeId>,
        tick_rate_hz: u32,
        epoch: Timestamp,
    ) -> Self {
        let mut consumers = vec![Vec::new(); nodes.len()];
        for edge in edges {
            consumers[edge.from.index()].push(edge.to);
        }

        Self {
            nodes,
            consumers,
            edge_count: edges.len(),
            schedule,
            outboxes: Vec::new(),
            tick: 0,
            tick_rate_hz,
            epoch,
            started: false,
            stopped: false,
            stats_interval: None,
            last_stats: Duration::ZERO,
            last_tick_time: None,
        }
    }

    /// Log per-node counters every `interval` while [`run`](Self::run) is
    /// looping.
    pub fn set_stats_interval(&mut self, interval: Option<Duration>) {
        self.stats_interval = interval;
    }

    /// Call `on_start` on every node, in arena order. `now` is the scheduler
    /// time the first tick is measured from.
    pub fn start_at(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        self.last_stats = now;
        let clock = self.clock(now);
        for idx in 0..self.nodes.len() {
            self.dispatch(NodeId(idx as u32), 0, clock, Hook::Start);
        }
    }

    /// Run one tick at scheduler time `now`. Starts the scheduler first if
    /// needed.
    pub fn tick_at(&mut self, now: Duration) {
        if !self.started {
            self.start_at(now);
        }
        let clock = self.clock(now);
        for i in 0..self.schedule.len() {
            let id = self.schedule[i];
            self.dispatch(id, 0, clock, Hook::Tick);
        }
        self.tick += 1;
    }

    /// Tick at the configured rate until `running` is cleared, then stop.
    pub fn run(&mut self, running: Arc<AtomicBool>) {
        tracing::info!(
            "Scheduler started: {} nodes, {} scheduled, {} Hz",
            self.nodes.len(),
            self.schedule.len(),
            self.tick_rate_hz
        );
        let start = Instant::now();

        while running.load(Ordering::Relaxed) {
            let now = start.elapsed();
            self.last_tick_time = Some(Instant::now());
            self.tick_at(now);

            if let Some(interval) = self.stats_interval {
                if now.saturating_sub(self.last_stats) >= interval {
                    self.log_stats();
                    self.last_stats = now;
                }
            }

            self.rate_limit();
        }

        self.stop();
        tracing::info!("Scheduler stopped after {} ticks", self.tick);
    }

    /// Call `on_stop` on every node. Further ticks are still possible but
    /// `on_stop` is only ever called once.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        for slot in &mut self.nodes {
            slot.node.on_stop();
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|s| s.node.name())
    }

    pub fn stats(&self, id: NodeId) -> Option<NodeStats> {
        self.nodes.get(id.index()).map(|s| s.stats)
    }

    /// Snapshot of every node's name, counters and status line.
    pub fn stats_snapshot(&self) -> Vec<(String, NodeStats, Option<String>)> {
        self.nodes
            .iter()
            .map(|s| (s.node.name().to_string(), s.stats, s.node.status()))
            .collect()
    }

    pub fn log_stats(&self) {
        for (name, stats, status) in self.stats_snapshot() {
            tracing::info!(
                "{}: ticks={} received={} emitted={}{}",
                name,
                stats.ticks,
                stats.received,
                stats.emitted,
                status.map(|s| format!(" {}", s)).unwrap_or_default()
            );
        }
    }

    fn clock(&self, now: Duration) -> Clock {
        Clock {
            now,
            timestamp: self.epoch + now,
            tick: self.tick,
        }
    }

    fn take_outbox(&mut self, depth: usize) -> Vec<Payload> {
        if self.outboxes.len() <= depth {
            self.outboxes.resize_with(depth + 1, Vec::new);
        }
        std::mem::take(&mut self.outboxes[depth])
    }

    /// Run one hook on `id`, then deliver whatever it emitted.
    fn dispatch(&mut self, id: NodeId, depth: usize, clock: Clock, hook: Hook<'_>) {
        let mut outbox = self.take_outbox(depth);
        {
            let slot = &mut self.nodes[id.index()];
            let mut ctx = NodeContext::new(clock, &mut outbox);
            match hook {
                Hook::Start => slot.node.on_start(&mut ctx),
                Hook::Tick => {
                    slot.stats.ticks += 1;
                    slot.node.on_tick(&mut ctx);
                }
                Hook::Receive(payload) => {
                    slot.stats.received += 1;
                    slot.node.on_receive(payload, &mut ctx);
                }
            }
            slot.stats.emitted += outbox.len() as u64;
        }

        for payload in &outbox {
            let kind = PortKind::of(payload);
            for i in 0..self.consumers[id.index()].len() {
                let consumer = self.consumers[id.index()][i];
                if !accepts(self.nodes[consumer.index()].node.ports(), kind) {
                    continue;
                }
                self.dispatch(consumer, depth + 1, clock, Hook::Receive(payload));
            }
        }

        outbox.clear();
        self.outboxes[depth] = outbox;
    }

    fn rate_limit(&self) {
        if self.tick_rate_hz == 0 {
            std::thread::sleep(Duration::from_millis(10));
            return;
        }

        let target_interval = Duration::from_nanos(1_000_000_000 / self.tick_rate_hz as u64);

        if let Some(last) = self.last_tick_time {
            let elapsed = last.elapsed();
            if elapsed < target_interval {
                let remaining = target_interval - elapsed;
                // Spin for sub-millisecond accuracy, sleep for larger waits
                if remaining > Duration::from_millis(2) {
                    std::thread::sleep(remaining - Duration::from_millis(1));
                }
                while last.elapsed() < target_interval {
                    std::hint::spin_loop();
                }
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.started {
            self.stop();
        }
    }
}
