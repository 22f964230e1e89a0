//! BarometerSampler node: outside air pressure.

use crate::drivers::BarometerDriver;
use crate::model::{Quantity, SensorUpdate, Source, SourceInput};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::port::{PortDescriptor, PortKind};

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("updates", PortKind::Update)];

pub struct BarometerSamplerNode<B> {
    driver: B,
    samples: u64,
}

impl<B: BarometerDriver> BarometerSamplerNode<B> {
    pub fn new(driver: B) -> Self {
        Self { driver, samples: 0 }
    }
}

impl<B: BarometerDriver> Node for BarometerSamplerNode<B> {
    fn name(&self) -> &str {
        "BarometerSampler"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        let Some(pascals) = self
            .driver
            .read_pressure()
            .filter(|p| p.is_finite() && *p > 0.0)
        else {
            return;
        };
        let mut update =
            SensorUpdate::new(ctx.timestamp, Source::local(SourceInput::Barometer), 1);
        update.set(Quantity::OutsidePressure, pascals);
        self.samples += 1;
        ctx.emit(update);
    }

    fn status(&self) -> Option<String> {
        Some(format!("samples={}", self.samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::MockBarometerDriver;
    use crate::model::Timestamp;
    use crate::pipeline::node::Clock;
    use std::time::Duration;

    fn tick(node: &mut BarometerSamplerNode<MockBarometerDriver>) -> usize {
        let clock = Clock {
            now: Duration::from_secs(2),
            timestamp: Timestamp::from_millis(2_000),
            tick: 200,
        };
        let mut outbox = Vec::new();
        node.on_tick(&mut NodeContext::new(clock, &mut outbox));
        if let Some(update) = outbox.first().and_then(|p| p.as_update()) {
            assert_eq!(update.source().input, SourceInput::Barometer);
            assert_eq!(update.get(Quantity::OutsidePressure), Some(101_325.0));
        }
        outbox.len()
    }

    #[test]
    fn test_pressure_reading() {
        let mut baro = MockBarometerDriver::new();
        baro.expect_read_pressure().return_const(Some(101_325.0));
        let mut node = BarometerSamplerNode::new(baro);
        assert_eq!(tick(&mut node), 1);
        assert_eq!(node.status().unwrap(), "samples=1");
    }

    #[test]
    fn test_unusable_readings_are_skipped() {
        let mut baro = MockBarometerDriver::new();
        let mut readings = vec![None, Some(f64::NAN), Some(0.0)].into_iter();
        baro.expect_read_pressure()
            .times(3)
            .returning(move || readings.next().flatten());
        let mut node = BarometerSamplerNode::new(baro);
        for _ in 0..3 {
            assert_eq!(tick(&mut node), 0);
        }
    }
}
