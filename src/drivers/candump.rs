//! Replay of `candump` text logs.
//!
//! Two line shapes are accepted:
//!
//! ```text
//! (1700000000.123456) can0 09F80203#0102030405060708    # candump -l
//!   can0  09F80203   [8]  01 02 03 04 05 06 07 08        # candump default
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::drivers::{CanDriver, RawCanFrame};
use crate::error::{GatewayError, Result, ResultExt};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A [`CanDriver`] that hands out the frames of a capture, one per call.
#[derive(Debug, Default)]
pub struct CandumpReplay {
    frames: VecDeque<RawCanFrame>,
    total: usize,
}

impl CandumpReplay {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(GatewayError::Io)
            .with_context(|| format!("opening capture {}", path.display()))?;
        let replay = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("reading capture {}", path.display()))?;
        tracing::info!(
            "Loaded {} frames from {}",
            replay.total,
            path.display()
        );
        Ok(replay)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut frames = VecDeque::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(frame) = parse_line(&line, idx + 1)? {
                frames.push_back(frame);
            }
        }
        let total = frames.len();
        Ok(Self { frames, total })
    }

    pub fn from_frames(frames: impl IntoIterator<Item = RawCanFrame>) -> Self {
        let frames: VecDeque<_> = frames.into_iter().collect();
        let total = frames.len();
        Self { frames, total }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl CanDriver for CandumpReplay {
    fn try_recv(&mut self) -> Option<RawCanFrame> {
        self.frames.pop_front()
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Parse one capture line. `Ok(None)` for lines that carry no frame.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<RawCanFrame>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let err = |message: &str| GatewayError::Parse {
        line: line_no,
        message: message.to_string(),
    };

    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_some_and(|t| t.starts_with('(')) {
        tokens.next();
    }
    let _interface = tokens.next().ok_or_else(|| err("missing interface"))?;
    let frame_token = tokens.next().ok_or_else(|| err("missing CAN id"))?;

    // candump -l: ID#DATA
    if let Some((id, data)) = frame_token.split_once('#') {
        let id = parse_id(id).ok_or_else(|| err("invalid CAN id"))?;
        if !data.is_ascii() || data.len() % 2 != 0 {
            return Err(err("invalid data field"));
        }
        let mut payload = Vec::with_capacity(data.len() / 2);
        for i in (0..data.len()).step_by(2) {
            let byte = u8::from_str_radix(&data[i..i + 2], 16)
                .map_err(|_| err("invalid data byte"))?;
            payload.push(byte);
        }
        if payload.len() > 8 {
            return Err(err("more than 8 data bytes"));
        }
        return Ok(Some(RawCanFrame::new(id, &payload)));
    }

    // candump default: ID [N] B0 B1 ...
    let id = parse_id(frame_token).ok_or_else(|| err("invalid CAN id"))?;
    let dlc = tokens
        .next()
        .and_then(|t| t.strip_prefix('[')?.strip_suffix(']')?.parse::<usize>().ok())
        .ok_or_else(|| err("missing [len]"))?;
    if dlc > 8 {
        return Err(err("more than 8 data bytes"));
    }
    let payload = tokens
        .take(dlc)
        .map(|t| u8::from_str_radix(t, 16))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|_| err("invalid data byte"))?;
    if payload.len() != dlc {
        return Err(err("fewer data bytes than [len]"));
    }
    Ok(Some(RawCanFrame::new(id, &payload)))
}

fn parse_id(token: &str) -> Option<u32> {
    u32::from_str_radix(token, 16)
        .ok()
        .filter(|id| *id <= 0x1FFF_FFFF)
}
