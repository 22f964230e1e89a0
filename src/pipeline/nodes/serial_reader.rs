//! SerialReader node: assembles NMEA 0183 lines from a serial port.

use crate::drivers::SerialPort;
use crate::model::SourceInput;
use crate::nmea0183::{ChecksumStatus, Sentence, MAX_SENTENCE_LEN};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{PortDescriptor, PortKind};

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("sentences", PortKind::Sentence)];

const READ_CHUNK: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerialStats {
    pub sentences: u64,
    pub bad_checksum: u64,
    /// Lines dropped for exceeding the sentence length limit or not looking
    /// like a sentence at all.
    pub discarded: u64,
}

pub struct SerialReaderNode<P> {
    port: P,
    input: SourceInput,
    name: String,
    line: [u8; MAX_SENTENCE_LEN],
    len: usize,
    overflow: bool,
    stats: SerialStats,
}

impl<P: SerialPort> SerialReaderNode<P> {
    pub fn new(port: P, input: SourceInput) -> Self {
        Self {
            port,
            input,
            name: format!("SerialReader({})", input),
            line: [0; MAX_SENTENCE_LEN],
            len: 0,
            overflow: false,
            stats: SerialStats::default(),
        }
    }

    pub fn stats(&self) -> SerialStats {
        self.stats
    }

    fn push_byte(&mut self, byte: u8, ctx: &mut NodeContext) {
        match byte {
            b'\n' => {
                self.finish_line(ctx);
                self.len = 0;
                self.overflow = false;
            }
            _ if self.overflow => {}
            _ if self.len == MAX_SENTENCE_LEN => {
                self.overflow = true;
                self.stats.discarded += 1;
            }
            _ => {
                self.line[self.len] = byte;
                self.len += 1;
            }
        }
    }

    fn finish_line(&mut self, ctx: &mut NodeContext) {
        if self.overflow || self.len == 0 {
            return;
        }
        let Some(sentence) = Sentence::new(&self.line[..self.len]) else {
            tracing::debug!("{}: discarding non-sentence line", self.name);
            self.stats.discarded += 1;
            return;
        };
        match sentence.checksum() {
            ChecksumStatus::Invalid { expected, actual } => {
                tracing::debug!(
                    "{}: checksum mismatch on {} (expected {:02X}, computed {:02X})",
                    self.name,
                    sentence.address(),
                    expected,
                    actual
                );
                self.stats.bad_checksum += 1;
            }
            ChecksumStatus::Valid | ChecksumStatus::Absent => {
                self.stats.sentences += 1;
                ctx.emit(Payload::Sentence(self.input, sentence));
            }
        }
    }
}

impl<P: SerialPort> Node for SerialReaderNode<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        let mut pending = self.port.bytes_available();
        let mut chunk = [0u8; READ_CHUNK];
        while pending > 0 {
            let want = pending.min(READ_CHUNK);
            let got = self.port.read(&mut chunk[..want]);
            if got == 0 {
                break;
            }
            for &byte in &chunk[..got] {
                self.push_byte(byte, ctx);
            }
            pending = pending.saturating_sub(got);
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!(
            "sentences={} bad_checksum={} discarded={}",
            self.stats.sentences, self.stats.bad_checksum, self.stats.discarded
        ))
    }
}
