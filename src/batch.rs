//! Multi-file decoding.
//!
//! Each input gets its own [`RecordPipeline`](crate::pipeline::RecordPipeline)
//! and its own sinks; nothing is shared between files.  With the `parallel`
//! feature the files are spread over Rayon's pool.  Records inside one file
//! are always decoded sequentially.
//!
//! A failure on one file (unreadable, strict-timestamp abort, sink I/O) is
//! reported in that file's [`BatchEntry`] and does not stop the others.
//! Inputs whose stems collide would write the same sink files, so none of
//! them is decoded and each gets a [`DecodeError::Config`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::DecodeError;
use crate::options::Config;
use crate::output::{base_name, OutputSet};
use crate::pipeline::{decode_file, DecodeStats};

#[derive(Debug)]
pub struct FileReport {
    pub stats:   DecodeStats,
    /// Sink files written, in his/table/spectra order.
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct BatchEntry {
    pub input:  PathBuf,
    pub result: Result<FileReport, DecodeError>,
}

/// Decode one file and write its enabled sinks.
pub fn decode_one(input: &Path, config: &Config) -> Result<FileReport, DecodeError> {
    let output = decode_file(input, &config.decode)?;

    let mut sinks = OutputSet::create(&base_name(input), &config.output)?;
    for rec in &output.records {
        sinks.write(rec)?;
    }
    let outputs = sinks.finish()?;

    info!(input = %input.display(), "{}", output.stats.summary());
    Ok(FileReport { stats: output.stats, outputs })
}

/// Decode every input; entries come back in input order.
pub fn decode_files(inputs: &[PathBuf], config: &Config) -> Vec<BatchEntry> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    for input in inputs {
        *stems.entry(base_name(input)).or_default() += 1;
    }

    let run = |input: &PathBuf| {
        let stem = base_name(input);
        let result = if stems.get(&stem).is_some_and(|&n| n > 1) {
            Err(DecodeError::Config(format!(
                "{} shares the output name {stem:?} with another input",
                input.display(),
            )))
        } else {
            decode_one(input, config)
        };
        if let Err(e) = &result {
            error!(input = %input.display(), "decode failed: {e}");
        }
        BatchEntry { input: input.clone(), result }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(run).collect()
    }
}
