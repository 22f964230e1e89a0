//! LogSink node: writes one JSON line per payload.
//!
//! Frames and sentences are logged raw; updates are logged as their Signal K
//! delta. Write failures are counted and logged, never propagated.

use crate::model::DeltaUpdate;
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::payload::Payload;
use crate::pipeline::port::{PortDescriptor, PortKind};
use serde::Serialize;
use std::io::Write;

static PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("frames", PortKind::Frame),
    PortDescriptor::input("sentences", PortKind::Sentence),
    PortDescriptor::input("updates", PortKind::Update),
];

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogRecord<'a> {
    Frame {
        timestamp: String,
        pgn: u32,
        priority: u8,
        src: u8,
        data: String,
    },
    Sentence {
        timestamp: String,
        input: String,
        text: &'a str,
    },
    Update { updates: Vec<DeltaUpdate> },
}

impl<'a> LogRecord<'a> {
    /// `None` for payloads not worth a line (empty updates).
    pub fn from_payload(payload: &'a Payload, ctx: &NodeContext) -> Option<Self> {
        match payload {
            Payload::Frame(frame) => Some(LogRecord::Frame {
                timestamp: ctx.timestamp.to_rfc3339(),
                pgn: frame.pgn,
                priority: frame.priority,
                src: frame.source,
                data: frame
                    .payload()
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect(),
            }),
            Payload::Sentence(input, sentence) => Some(LogRecord::Sentence {
                timestamp: ctx.timestamp.to_rfc3339(),
                input: input.label(),
                text: sentence.as_str(),
            }),
            Payload::Update(update) => update
                .to_delta()
                .map(|delta| LogRecord::Update {
                    updates: delta.updates,
                }),
        }
    }
}

pub struct LogSinkNode<W: Write> {
    writer: W,
    lines: u64,
    errors: u64,
}

impl<W: Write> LogSinkNode<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            errors: 0,
        }
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &LogRecord) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> Node for LogSinkNode<W> {
    fn name(&self) -> &str {
        "LogSink"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_receive(&mut self, payload: &Payload, ctx: &mut NodeContext) {
        let Some(record) = LogRecord::from_payload(payload, ctx) else {
            return;
        };
        match self.write_record(&record) {
            Ok(()) => self.lines += 1,
            Err(e) => {
                self.errors += 1;
                // One warning per burst, not per line.
                if self.errors == 1 || self.errors.is_power_of_two() {
                    tracing::warn!("LogSink write failed ({} so far): {}", self.errors, e);
                }
            }
        }
    }

    fn on_stop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("LogSink flush failed: {}", e);
        }
    }

    fn status(&self) -> Option<String> {
        Some(format!("lines={} errors={}", self.lines, self.errors))
    }
}
