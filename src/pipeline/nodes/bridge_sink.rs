//! BridgeSink node: hands Signal K deltas to the wireless bridge.
//!
//! Sensor updates go out as Signal K delta JSON. NMEA 0183 sentences from
//! the serial lines are passed through as their raw text, one per message.
//!
//! The bridge transport runs elsewhere and drains a bounded crossbeam
//! channel. When it falls behind, messages are dropped and counted here
//! rather than stalling the tick loop.

use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{PortDescriptor, PortKind};
use crossbeam_channel::{Sender, TrySendError};

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("updates", PortKind::Update),
    PortDescriptor::input("sentences", PortKind::Sentence),
];

pub struct BridgeSinkNode {
    tx: Sender<String>,
    sent: u64,
    dropped: u64,
    disconnected: bool,
}

impl BridgeSinkNode {
    pub fn new(tx: Sender<String>) -> Self {
        Self {
            tx,
            sent: 0,
            dropped: 0,
            disconnected: false,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Node for BridgeSinkNode {
    fn name(&self) -> &str {
        "BridgeSink"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_start(&mut self, _ctx: &mut NodeContext) {
        self.dropped = 0;
    }

    fn on_receive(&mut self, payload: &Payload, _ctx: &mut NodeContext) {
        if self.disconnected {
            return;
        }
        let message = match payload {
            Payload::Update(update) => update.to_delta_json(),
            Payload::Sentence(_, sentence) => Some(sentence.as_str().to_string()),
            Payload::Frame(_) => None,
        };
        let Some(message) = message else {
            return;
        };
        match self.tx.try_send(message) {
            Ok(()) => self.sent += 1,
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("BridgeSink: bridge channel closed, nothing further is sent");
                self.disconnected = true;
            }
        }
    }

    fn on_stop(&mut self) {
        if self.dropped > 0 {
            tracing::warn!("BridgeSink dropped {} messages due to backpressure", self.dropped);
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("sent={} dropped={}", self.sent, self.dropped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Quantity, SensorUpdate, Source, SourceInput, Timestamp};
    use crate::n2k::N2kFrame;
    use crate::nmea0183::Sentence;
    use crate::pipeline::node::Clock;
    use crossbeam_channel::bounded;
    use std::time::Duration;

    fn voltage(v: f64) -> Payload {
        let mut update = SensorUpdate::new(Timestamp::ZERO, Source::local(SourceInput::Adc), 1);
        update.set(Quantity::SupplyVoltage, v);
        Payload::Update(update)
    }

    fn receive(node: &mut BridgeSinkNode, payload: Payload) {
        let clock = Clock {
            now: Duration::ZERO,
            timestamp: Timestamp::ZERO,
            tick: 0,
        };
        let mut outbox = Vec::new();
        node.on_receive(&payload, &mut NodeContext::new(clock, &mut outbox));
    }

    #[test]
    fn test_backpressure_drops_and_counts() {
        let (tx, rx) = bounded(2);
        let mut node = BridgeSinkNode::new(tx);
        for i in 0..5 {
            receive(&mut node, voltage(12.0 + i as f64));
        }
        assert_eq!(node.sent(), 2);
        assert_eq!(node.dropped(), 3);

        let first: serde_json::Value = serde_json::from_str(&rx.recv().unwrap()).unwrap();
        assert_eq!(first["updates"][0]["values"][0]["value"], 12.0);
    }

    #[test]
    fn test_empty_update_is_not_sent() {
        let (tx, rx) = bounded(2);
        let mut node = BridgeSinkNode::new(tx);
        receive(&mut node, Payload::Update(SensorUpdate::empty()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sentences_pass_through_as_text() {
        let (tx, rx) = bounded(4);
        let mut node = BridgeSinkNode::new(tx);
        let sentence = Sentence::new(b"$IIDBT,13.8,f,4.2,M,2.3,F*2B\r\n").unwrap();

        receive(&mut node, Payload::Sentence(SourceInput::Nmea0183(1), sentence));
        receive(&mut node, voltage(12.5));
        receive(&mut node, Payload::Frame(N2kFrame::new(127245, 2, 0x23, &[0; 8])));

        assert_eq!(node.sent(), 2);
        assert_eq!(rx.try_recv().unwrap(), "$IIDBT,13.8,f,4.2,M,2.3,F*2B");
        assert!(rx.try_recv().unwrap().starts_with('{'));
        assert!(rx.try_recv().is_err());
    }
}
