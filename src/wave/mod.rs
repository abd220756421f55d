//! Spectral moments and the bulk wave statistics derived from them.

pub mod moments;
pub mod params;

pub use moments::Moments;
pub use params::WaveParameters;
