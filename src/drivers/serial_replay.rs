//! Replay of a recorded serial stream, paced at the line's baud rate.
//!
//! A capture is the raw byte stream of one NMEA 0183 or Seatalk line, as
//! written by `cat /dev/ttyUSB0 > capture.nmea`. Each poll hands out at most
//! the number of bytes the line could have carried in one scheduler tick,
//! assuming 8N1 framing (ten bits per byte).

use crate::drivers::SerialPort;
use crate::error::{GatewayError, Result, ResultExt};
use std::path::Path;

/// A [`SerialPort`] backed by an in-memory byte stream.
#[derive(Debug, Default)]
pub struct SerialReplay {
    data: Vec<u8>,
    pos: usize,
    bytes_per_poll: usize,
}

impl SerialReplay {
    pub fn open(path: impl AsRef<Path>, baud_rate: u32, tick_rate_hz: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(GatewayError::Io)
            .with_context(|| format!("opening serial capture {}", path.display()))?;
        tracing::info!(
            "Loaded {} bytes from {} ({} baud)",
            data.len(),
            path.display(),
            baud_rate
        );
        Ok(Self::from_bytes(data, baud_rate, tick_rate_hz))
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>, baud_rate: u32, tick_rate_hz: u32) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            bytes_per_poll: bytes_per_tick(baud_rate, tick_rate_hz),
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn bytes_per_poll(&self) -> usize {
        self.bytes_per_poll
    }
}

/// Bytes an 8N1 line at `baud_rate` carries per tick, never less than one.
pub fn bytes_per_tick(baud_rate: u32, tick_rate_hz: u32) -> usize {
    let bytes_per_second = baud_rate / 10;
    (bytes_per_second / tick_rate_hz.max(1)).max(1) as usize
}

impl SerialPort for SerialReplay {
    fn bytes_available(&mut self) -> usize {
        self.remaining().min(self.bytes_per_poll)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_line_rate_pacing() {
        assert_eq!(bytes_per_tick(4800, 100), 4);
        assert_eq!(bytes_per_tick(38_400, 100), 38);
        assert_eq!(bytes_per_tick(4800, 1_000), 1);
        assert_eq!(bytes_per_tick(4800, 0), 480);
    }

    #[test]
    fn test_polls_are_capped_at_line_rate() {
        let mut port = SerialReplay::from_bytes(b"$IIDBT,,*00\r\n".to_vec(), 4800, 100);
        let mut buf = [0u8; 64];

        assert_eq!(port.bytes_available(), 4);
        let n = port.bytes_available();
        assert_eq!(port.read(&mut buf[..n]), 4);
        assert_eq!(&buf[..4], b"$IID");
        assert_eq!(port.remaining(), 9);

        let mut total = 4;
        while port.bytes_available() > 0 {
            let n = port.bytes_available();
            total += port.read(&mut buf[..n]);
        }
        assert_eq!(total, 13);
        assert_eq!(port.read(&mut buf), 0);
    }

    #[test]
    fn test_open_reads_capture_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"$GPGLL,,,,,,V*00\r\n").unwrap();

        let port = SerialReplay::open(file.path(), 38_400, 50).unwrap();
        assert_eq!(port.remaining(), 18);
        assert_eq!(port.bytes_per_poll(), 76);
    }

    #[test]
    fn test_open_missing_file_names_path() {
        let err = SerialReplay::open("/nonexistent/line1.nmea", 4800, 100).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/line1.nmea"));
    }
}
