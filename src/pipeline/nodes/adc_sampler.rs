//! AdcSampler node: turns analog channel readings into voltage updates.
//!
//! Usually wrapped in [`Periodic`](crate::pipeline::Periodic) so the ADC is
//! read at the configured sampling interval rather than every tick.

use crate::drivers::AdcDriver;
use crate::model::{Quantity, SensorUpdate, Source, SourceInput, MAX_UPDATE_ENTRIES};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::port::{PortDescriptor, PortKind};
use serde::{Deserialize, Serialize};

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("updates", PortKind::Update)];

/// One ADC input and the quantity it measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdcChannel {
    pub channel: u8,
    pub quantity: Quantity,
    /// Input divider ratio: volts at the terminal per volt at the ADC pin.
    pub scale: f64,
}

impl AdcChannel {
    pub fn new(channel: u8, quantity: Quantity, scale: f64) -> Self {
        Self {
            channel,
            quantity,
            scale,
        }
    }
}

/// Supply rail and three battery banks behind the usual 1:11 dividers.
pub fn default_channels() -> Vec<AdcChannel> {
    vec![
        AdcChannel::new(0, Quantity::SupplyVoltage, 11.0),
        AdcChannel::new(1, Quantity::Battery1Voltage, 11.0),
        AdcChannel::new(2, Quantity::Battery2Voltage, 11.0),
        AdcChannel::new(3, Quantity::Battery3Voltage, 11.0),
    ]
}

pub struct AdcSamplerNode<A> {
    driver: A,
    channels: Vec<AdcChannel>,
    samples: u64,
}

impl<A: AdcDriver> AdcSamplerNode<A> {
    /// Channels past [`MAX_UPDATE_ENTRIES`] are ignored.
    pub fn new(driver: A, mut channels: Vec<AdcChannel>) -> Self {
        if channels.len() > MAX_UPDATE_ENTRIES {
            tracing::warn!(
                "AdcSampler: {} channels configured, only the first {} are sampled",
                channels.len(),
                MAX_UPDATE_ENTRIES
            );
            channels.truncate(MAX_UPDATE_ENTRIES);
        }
        Self {
            driver,
            channels,
            samples: 0,
        }
    }

    pub fn channels(&self) -> &[AdcChannel] {
        &self.channels
    }
}

impl<A: AdcDriver> Node for AdcSamplerNode<A> {
    fn name(&self) -> &str {
        "AdcSampler"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        let mut update = SensorUpdate::new(
            ctx.timestamp,
            Source::local(SourceInput::Adc),
            self.channels.len(),
        );
        for ch in &self.channels {
            if let Some(mv) = self.driver.read_millivolts(ch.channel) {
                update.set(ch.quantity, mv as f64 / 1000.0 * ch.scale);
            }
        }
        if !update.is_empty() {
            self.samples += 1;
            ctx.emit(update);
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("samples={}", self.samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::MockAdcDriver;
    use crate::model::Timestamp;
    use crate::pipeline::node::Clock;
    use crate::pipeline::payload::Payload;
    use mockall::predicate::eq;
    use std::time::Duration;

    #[test]
    fn test_scaled_voltages_and_missing_channel() {
        let mut adc = MockAdcDriver::new();
        adc.expect_read_millivolts()
            .with(eq(0))
            .return_const(Some(1200u32));
        adc.expect_read_millivolts()
            .with(eq(1))
            .return_const(None::<u32>);

        let channels = vec![
            AdcChannel::new(0, Quantity::SupplyVoltage, 10.0),
            AdcChannel::new(1, Quantity::Battery1Voltage, 10.0),
        ];
        let mut node = AdcSamplerNode::new(adc, channels);
        let clock = Clock {
            now: Duration::from_secs(1),
            timestamp: Timestamp::from_millis(5_000),
            tick: 10,
        };
        let mut outbox = Vec::new();
        node.on_tick(&mut NodeContext::new(clock, &mut outbox));

        let Payload::Update(update) = outbox[0] else {
            panic!("expected an update");
        };
        assert_eq!(update.get(Quantity::SupplyVoltage), Some(12.0));
        assert_eq!(update.get(Quantity::Battery1Voltage), None);
        assert_eq!(update.source().input, SourceInput::Adc);
        assert_eq!(update.timestamp(), Timestamp::from_millis(5_000));
    }

    #[test]
    fn test_no_readings_emits_nothing() {
        let mut adc = MockAdcDriver::new();
        adc.expect_read_millivolts().return_const(None::<u32>);
        let mut node = AdcSamplerNode::new(adc, default_channels());
        let mut outbox = Vec::new();
        let clock = Clock {
            now: Duration::ZERO,
            timestamp: Timestamp::ZERO,
            tick: 0,
        };
        node.on_tick(&mut NodeContext::new(clock, &mut outbox));
        assert!(outbox.is_empty());
    }
}
