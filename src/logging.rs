//! `tracing` subscriber setup for the CLI.
//!
//! `RUST_LOG` takes precedence over the verbosity flags.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    /// Per-record diagnostics (checksum rejects).
    Verbose,
    Trace,
}

impl Verbosity {
    /// `-q` wins over any number of `-v`.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (_, 0)    => Self::Normal,
            (_, 1)    => Self::Verbose,
            _         => Self::Trace,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Self::Quiet   => Level::ERROR,
            Self::Normal  => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace   => Level::TRACE,
        }
    }
}

/// Install the global subscriber.  Later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("sdtwave={}", verbosity.level());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
