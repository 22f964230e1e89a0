//! NMEA 0183 sentence buffer.
//!
//! Sentences are at most 82 characters including the leading `$`/`!` and the
//! trailing `\r\n`. They are carried through the graph inline, without heap
//! allocation, the same way frames and updates are.

use std::fmt;

/// Longest sentence the standard allows, `\r\n` included.
pub const MAX_SENTENCE_LEN: usize = 82;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// No `*hh` suffix.
    Absent,
    Valid,
    Invalid { expected: u8, actual: u8 },
}

/// One line received from a serial NMEA 0183 port, without line terminator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sentence {
    buf: [u8; MAX_SENTENCE_LEN],
    len: u8,
}

impl Sentence {
    /// `None` if the line is too long or does not start with `$` or `!`.
    pub fn new(line: &[u8]) -> Option<Self> {
        let line = trim_terminator(line);
        if line.is_empty() || line.len() > MAX_SENTENCE_LEN - 2 {
            return None;
        }
        if !matches!(line[0], b'$' | b'!') || !line.is_ascii() {
            return None;
        }
        let mut buf = [0u8; MAX_SENTENCE_LEN];
        buf[..line.len()].copy_from_slice(line);
        Some(Self {
            buf,
            len: line.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address field, e.g. `GPRMC` or `IIMWV`.
    pub fn address(&self) -> &str {
        let body = &self.as_str()[1..];
        body.split([',', '*']).next().unwrap_or_default()
    }

    /// Two-letter talker identifier (`GP`, `II`...).
    pub fn talker(&self) -> Option<&str> {
        let address = self.address();
        (address.len() == 5).then(|| &address[..2])
    }

    pub fn sentence_type(&self) -> Option<&str> {
        let address = self.address();
        (address.len() >= 3).then(|| &address[address.len() - 3..])
    }

    /// Comma separated data fields after the address, checksum excluded.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        let s = self.as_str();
        let end = s.rfind('*').unwrap_or(s.len());
        s[1..end].split(',').skip(1)
    }

    pub fn checksum(&self) -> ChecksumStatus {
        let s = self.as_bytes();
        let Some(star) = s.iter().rposition(|&b| b == b'*') else {
            return ChecksumStatus::Absent;
        };
        let actual = s[1..star].iter().fold(0u8, |acc, b| acc ^ b);
        let expected = std::str::from_utf8(&s[star + 1..])
            .ok()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match expected {
            Some(expected) if expected == actual => ChecksumStatus::Valid,
            Some(expected) => ChecksumStatus::Invalid { expected, actual },
            None => ChecksumStatus::Invalid {
                expected: 0,
                actual,
            },
        }
    }
}

fn trim_terminator(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

impl fmt::Debug for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sentence({:?})", self.as_str())
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MWV: &[u8] = b"$IIMWV,045.0,R,12.4,N,A*0B\r\n";

    #[test]
    fn test_address_parts() {
        let s = Sentence::new(MWV).unwrap();
        assert_eq!(s.address(), "IIMWV");
        assert_eq!(s.talker(), Some("II"));
        assert_eq!(s.sentence_type(), Some("MWV"));
        let fields: Vec<&str> = s.fields().collect();
        assert_eq!(fields, vec!["045.0", "R", "12.4", "N", "A"]);
    }

    #[test]
    fn test_checksum() {
        let good = Sentence::new(b"$GPGLL,4916.45,N,12311.12,W,225444,A*31").unwrap();
        assert_eq!(good.checksum(), ChecksumStatus::Valid);

        let bad = Sentence::new(b"$GPGLL,4916.45,N,12311.12,W,225444,A*32").unwrap();
        assert!(matches!(bad.checksum(), ChecksumStatus::Invalid { .. }));

        let none = Sentence::new(b"$GPGLL,4916.45,N").unwrap();
        assert_eq!(none.checksum(), ChecksumStatus::Absent);
    }

    #[test]
    fn test_rejects_garbage_and_overlong() {
        assert!(Sentence::new(b"hello").is_none());
        assert!(Sentence::new(b"\r\n").is_none());
        let mut long = vec![b'$'];
        long.extend(std::iter::repeat(b'A').take(90));
        assert!(Sentence::new(&long).is_none());
    }
}
