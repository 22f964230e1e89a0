//! Decoder node: NMEA 2000 frames in, sensor updates out.

use crate::model::SourceInput;
use crate::n2k::{DecoderStats, ProtocolDecoder};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{PortDescriptor, PortKind};

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("frames", PortKind::Frame),
    PortDescriptor::output("updates", PortKind::Update),
];

pub struct DecoderNode {
    decoder: ProtocolDecoder,
    input: SourceInput,
}

impl DecoderNode {
    pub fn new(input: SourceInput) -> Self {
        Self {
            decoder: ProtocolDecoder::new(),
            input,
        }
    }

    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    pub fn supported_pgns(&self) -> Vec<u32> {
        self.decoder.supported_pgns()
    }
}

impl Default for DecoderNode {
    fn default() -> Self {
        Self::new(SourceInput::Nmea2000)
    }
}

impl Node for DecoderNode {
    fn name(&self) -> &str {
        "Decoder"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_start(&mut self, _ctx: &mut NodeContext) {
        tracing::info!(
            "Decoder on {} handles PGNs {:?}",
            self.input.label(),
            self.supported_pgns()
        );
    }

    fn on_receive(&mut self, payload: &Payload, ctx: &mut NodeContext) {
        let Some(frame) = payload.as_frame() else {
            return;
        };
        let update = self.decoder.decode(self.input, frame, ctx.timestamp);
        if !update.is_empty() {
            ctx.emit(*update);
        }
    }

    fn status(&self) -> Option<String> {
        let stats = self.decoder.stats();
        Some(format!(
            "decoded={} unknown={} rejected={}",
            stats.decoded, stats.unknown, stats.rejected
        ))
    }
}
