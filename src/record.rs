//! On-disk record layout and the sequential reader.
//!
//! An SDT file is a run of back-to-back 556-byte records with no container
//! header and no record count:
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0      | 5    | reserved |
//! | 5      | 6    | timestamp |
//! | 11     | 512  | spectral block (64 bins × 8 bytes) |
//! | 523    | 32   | system block |
//! | 555    | 1    | XOR checksum |
//!
//! The reader never seeks.  A stream that ends anywhere inside a record is a
//! clean end of stream, not an error; the number of dangling bytes is
//! reported so callers can count a truncated tail.

use std::io::{self, Read, Write};

pub const RESERVED_SIZE:  usize = 5;
pub const TIMESTAMP_SIZE: usize = 6;
pub const SPECTRAL_SIZE:  usize = 512;
pub const SYSTEM_SIZE:    usize = 32;
pub const CHECKSUM_SIZE:  usize = 1;

/// Bytes covered by the checksum (everything but the reserved header).
pub const PAYLOAD_SIZE: usize = TIMESTAMP_SIZE + SPECTRAL_SIZE + SYSTEM_SIZE + CHECKSUM_SIZE;
pub const RECORD_SIZE:  usize = RESERVED_SIZE + PAYLOAD_SIZE;

/// Byte-exact image of one record, split into its fixed groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub reserved:  [u8; RESERVED_SIZE],
    pub timestamp: [u8; TIMESTAMP_SIZE],
    pub spectral:  [u8; SPECTRAL_SIZE],
    pub system:    [u8; SYSTEM_SIZE],
    pub checksum:  u8,
}

impl RawRecord {
    pub fn zeroed() -> Self {
        Self {
            reserved:  [0u8; RESERVED_SIZE],
            timestamp: [0u8; TIMESTAMP_SIZE],
            spectral:  [0u8; SPECTRAL_SIZE],
            system:    [0u8; SYSTEM_SIZE],
            checksum:  0,
        }
    }

    /// The checksummed groups in on-disk order.
    pub fn payload_groups(&self) -> [&[u8]; 4] {
        [
            &self.timestamp,
            &self.spectral,
            &self.system,
            std::slice::from_ref(&self.checksum),
        ]
    }

    /// Recompute the checksum byte so the payload XOR-reduces to zero.
    pub fn seal(&mut self) {
        self.checksum = crate::checksum::xor_reduce([
            &self.timestamp[..],
            &self.spectral[..],
            &self.system[..],
        ]);
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.reserved)?;
        writer.write_all(&self.timestamp)?;
        writer.write_all(&self.spectral)?;
        writer.write_all(&self.system)?;
        writer.write_all(&[self.checksum])?;
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECORD_SIZE);
        out.extend_from_slice(&self.reserved);
        out.extend_from_slice(&self.timestamp);
        out.extend_from_slice(&self.spectral);
        out.extend_from_slice(&self.system);
        out.push(self.checksum);
        out
    }
}

/// Result of one read attempt.
#[derive(Debug)]
pub enum ReadOutcome {
    Record(Box<RawRecord>),
    /// No further complete record.  `trailing` counts the bytes of a
    /// partial record that were consumed; zero for a clean boundary.
    EndOfStream { trailing: usize },
}

/// Forward-only reader yielding one [`RawRecord`] per call.
pub struct RecordReader<R: Read> {
    inner:  R,
    offset: u64,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed from the underlying stream so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn next_record(&mut self) -> io::Result<ReadOutcome> {
        let mut rec = Box::new(RawRecord::zeroed());
        let mut consumed = 0usize;

        let n = self.fill(&mut rec.reserved)?;
        consumed += n;
        if n < RESERVED_SIZE {
            return Ok(ReadOutcome::EndOfStream { trailing: consumed });
        }

        let n = self.fill(&mut rec.timestamp)?;
        consumed += n;
        if n < TIMESTAMP_SIZE {
            return Ok(ReadOutcome::EndOfStream { trailing: consumed });
        }

        let n = self.fill(&mut rec.spectral)?;
        consumed += n;
        if n < SPECTRAL_SIZE {
            return Ok(ReadOutcome::EndOfStream { trailing: consumed });
        }

        let n = self.fill(&mut rec.system)?;
        consumed += n;
        if n < SYSTEM_SIZE {
            return Ok(ReadOutcome::EndOfStream { trailing: consumed });
        }

        let mut cs = [0u8; CHECKSUM_SIZE];
        let n = self.fill(&mut cs)?;
        consumed += n;
        if n < CHECKSUM_SIZE {
            return Ok(ReadOutcome::EndOfStream { trailing: consumed });
        }
        rec.checksum = cs[0];

        Ok(ReadOutcome::Record(rec))
    }

    /// Read until `buf` is full or the stream is exhausted.  Unlike
    /// `read_exact`, a short read leaves a well-defined byte count.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }
}
