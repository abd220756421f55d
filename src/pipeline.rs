//! Record pipeline: one pass over an SDT stream.
//!
//! ```no_run
//! use sdtwave::options::DecodeOptions;
//! use sdtwave::pipeline::decode_file;
//!
//! let out = decode_file("buoy.SDT", &DecodeOptions::default())?;
//! for rec in &out.records {
//!     println!("{} Hm0={:.2}", rec.timestamp, rec.parameters.hm0);
//! }
//! println!("{} rejected", out.stats.rejected);
//! # Ok::<(), sdtwave::DecodeError>(())
//! ```
//!
//! Per record: checksum, timestamp, system block, spectral block (which
//! needs the system block's Smax and position), moments, parameters.
//! Checksum failures and invalid timestamps drop only that record.  A
//! partial trailing record ends the stream quietly.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::checksum;
use crate::error::DecodeError;
use crate::options::{DecodeOptions, TimestampPolicy};
use crate::record::{RawRecord, ReadOutcome, RecordReader, RECORD_SIZE};
use crate::spectral::{self, SpectralBin};
use crate::system::SystemReading;
use crate::timestamp::Timestamp;
use crate::wave::{Moments, WaveParameters};

// ── Types ─────────────────────────────────────────────────────────────────────

/// One fully decoded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    pub timestamp:  Timestamp,
    pub parameters: WaveParameters,
    pub system:     SystemReading,
    /// 64 bins in on-disk order.
    pub bins:       Vec<SpectralBin>,
}

/// Counters for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    /// Complete records read.
    pub seen:               usize,
    pub accepted:           usize,
    /// Dropped on checksum mismatch.
    pub rejected:           usize,
    /// Dropped on a calendar-invalid timestamp.
    pub invalid_timestamps: usize,
    /// 1 when the stream ended inside a record.
    pub truncated:          usize,
    pub trailing_bytes:     usize,
}

impl DecodeStats {
    pub fn summary(&self) -> String {
        format!(
            "{} seen, {} accepted, {} checksum rejects, {} bad timestamps, {} trailing byte(s)",
            self.seen, self.accepted, self.rejected, self.invalid_timestamps, self.trailing_bytes,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Reading,
    Done,
}

/// Everything a finished pipeline hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub records: Vec<DecodedRecord>,
    pub stats:   DecodeStats,
}

// ── Single record ─────────────────────────────────────────────────────────────

/// Validate and decode one raw record.
pub fn decode_record(raw: &RawRecord) -> Result<DecodedRecord, DecodeError> {
    checksum::validate(raw)?;
    let timestamp = Timestamp::decode(&raw.timestamp)?;

    let system = SystemReading::decode(&raw.system);
    let bins   = spectral::decode_block(&raw.spectral, &system.spectral_context());

    let moments    = Moments::from_bins(&bins);
    let parameters = WaveParameters::derive(&moments, &system);

    Ok(DecodedRecord { timestamp, parameters, system, bins })
}

// ── RecordPipeline ────────────────────────────────────────────────────────────

pub struct RecordPipeline<R: Read> {
    reader:  RecordReader<R>,
    options: DecodeOptions,
    state:   PipelineState,
    stats:   DecodeStats,
    records: Vec<DecodedRecord>,
}

impl<R: Read> RecordPipeline<R> {
    pub fn new(inner: R, options: DecodeOptions) -> Self {
        Self {
            reader:  RecordReader::new(inner),
            options,
            state:   PipelineState::Reading,
            stats:   DecodeStats::default(),
            records: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Consume the stream until `Done` and return every emitted record.
    pub fn run(mut self) -> Result<PipelineOutput, DecodeError> {
        while self.state == PipelineState::Reading {
            self.step()?;
        }
        Ok(PipelineOutput { records: self.records, stats: self.stats })
    }

    /// Process at most one raw record.
    fn step(&mut self) -> Result<(), DecodeError> {
        if self.options.max_records.is_some_and(|max| self.records.len() >= max) {
            self.state = PipelineState::Done;
            return Ok(());
        }

        let offset = self.reader.offset();
        let raw = match self.reader.next_record()? {
            ReadOutcome::Record(raw) => raw,
            ReadOutcome::EndOfStream { trailing } => {
                if trailing > 0 {
                    warn!(offset, trailing, "stream ends inside a {}-byte record", RECORD_SIZE);
                    self.stats.truncated      = 1;
                    self.stats.trailing_bytes = trailing;
                }
                self.state = PipelineState::Done;
                return Ok(());
            }
        };
        self.stats.seen += 1;

        match decode_record(&raw) {
            Ok(rec) => {
                self.stats.accepted += 1;
                self.records.push(rec);
            }
            Err(DecodeError::ChecksumMismatch { residue }) => {
                debug!(
                    offset,
                    residue,
                    timestamp = %hex::encode(raw.timestamp),
                    "checksum mismatch, record dropped"
                );
                self.stats.rejected += 1;
            }
            Err(err @ DecodeError::InvalidTimestamp { .. }) => {
                self.stats.invalid_timestamps += 1;
                match self.options.timestamp_policy {
                    TimestampPolicy::Skip => {
                        warn!(offset, error = %err, "record dropped");
                    }
                    TimestampPolicy::Abort => {
                        self.state = PipelineState::Done;
                        return Err(err);
                    }
                }
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

/// Decode a whole file from disk.
pub fn decode_file<P: AsRef<Path>>(
    path:    P,
    options: &DecodeOptions,
) -> Result<PipelineOutput, DecodeError> {
    let file = BufReader::new(File::open(path)?);
    RecordPipeline::new(file, options.clone()).run()
}
