//! DashboardSink node: keeps the latest value of every quantity for the
//! display pages.

use crate::model::{Quantity, Source, Timestamp};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{PortDescriptor, PortKind};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

static PORTS: &[PortDescriptor] = &[PortDescriptor::input("updates", PortKind::Update)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub timestamp: Timestamp,
    pub source: Source,
}

/// Latest reading per quantity. Last writer wins regardless of source.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    readings: [Option<Reading>; Quantity::COUNT],
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self {
            readings: [None; Quantity::COUNT],
        }
    }
}

impl DashboardStore {
    pub fn get(&self, quantity: Quantity) -> Option<&Reading> {
        self.readings[quantity.index()].as_ref()
    }

    /// Latest value if it is no older than `max_age` at `now`.
    pub fn fresh(&self, quantity: Quantity, now: Timestamp, max_age: Duration) -> Option<f64> {
        let max_age = max_age.as_millis() as u64;
        self.get(quantity)
            .filter(|r| now.as_millis().saturating_sub(r.timestamp.as_millis()) <= max_age)
            .map(|r| r.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quantity, &Reading)> {
        Quantity::ALL
            .iter()
            .filter_map(|&q| self.get(q).map(|r| (q, r)))
    }

    pub fn len(&self) -> usize {
        self.readings.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared view of the store for page renderers on the same thread.
pub type DashboardHandle = Rc<RefCell<DashboardStore>>;

#[derive(Default)]
pub struct DashboardSinkNode {
    store: DashboardHandle,
}

impl DashboardSinkNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> DashboardHandle {
        self.store.clone()
    }
}

impl Node for DashboardSinkNode {
    fn name(&self) -> &str {
        "DashboardSink"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_receive(&mut self, payload: &Payload, _ctx: &mut NodeContext) {
        let Some(update) = payload.as_update() else {
            return;
        };
        let mut store = self.store.borrow_mut();
        for a in update.iter() {
            store.readings[a.quantity.index()] = Some(Reading {
                value: a.value,
                timestamp: update.timestamp(),
                source: *update.source(),
            });
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("quantities={}", self.store.borrow().len()))
    }
}
