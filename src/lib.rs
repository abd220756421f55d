pub mod error;
pub mod record;
pub mod checksum;
pub mod timestamp;
pub mod system;
pub mod spectral;
pub mod wave;
pub mod pipeline;
pub mod options;
pub mod output;
pub mod batch;
pub mod logging;

pub use error::DecodeError;
pub use record::{RawRecord, RecordReader, ReadOutcome, RECORD_SIZE};
pub use timestamp::Timestamp;
pub use system::{SystemReading, SpectralContext};
pub use spectral::SpectralBin;
pub use wave::{Moments, WaveParameters};
pub use pipeline::{decode_file, decode_record, DecodedRecord, DecodeStats, RecordPipeline};
pub use options::{Config, DecodeOptions, OutputOptions, TimestampPolicy};
