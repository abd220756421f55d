//! Spectral block decoder, 64 directional bins per record.
//!
//! # Bin layout (8 bytes, `c0..c7`)
//!
//! | Byte | Bits | Meaning |
//! |------|------|---------|
//! | c0 | 0–5 | frequency index `jf` |
//! | c0 | 6–7 | spread LSBs |
//! | c1 | all | mean direction, 360/256 deg per step |
//! | c2 | 6–7 | m2 LSBs |
//! | c2 | 4–5 | n2 LSBs |
//! | c2–c3 | low 12 | log-coded density; `exp(-0.005·code)` scaled by Smax |
//! | c4 | all | spread MSBs |
//! | c5 | all | m2 MSBs |
//! | c6 | all | n2 MSBs |
//! | c7 | all | K, 0.01 per step |
//!
//! # Degenerate shapes
//!
//! Skewness divides by `sigma³` and kurtosis by `spread⁴` (radians).  When
//! either denominator is exactly zero the field is `f64::NAN`; the record is
//! still emitted.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;
use std::f64::consts::PI;

use crate::record::SPECTRAL_SIZE;
use crate::system::SpectralContext;

pub const BIN_SIZE:  usize = 8;
pub const BIN_COUNT: usize = SPECTRAL_SIZE / BIN_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralBin {
    pub frequency_hz:   f64,
    /// Smax × normalised density.
    pub power:          f64,
    pub direction_deg:  f64,
    pub spread:         f64,
    pub skewness:       f64,
    pub kurtosis:       f64,
    pub m2:             f64,
    pub n2:             f64,
    pub depth_factor_k: f64,
    pub latitude:       f64,
    pub longitude:      f64,
}

/// Centre frequency of index `jf`: 5 mHz steps from 25 mHz below index 16,
/// 10 mHz steps from 110 mHz above.
pub fn frequency(jf: u8) -> f64 {
    let jf = f64::from(jf % 64);
    if jf < 16.0 { jf * 0.005 + 0.025 } else { jf * 0.01 - 0.05 }
}

impl SpectralBin {
    pub fn decode(c: &[u8; BIN_SIZE], ctx: &SpectralContext) -> Self {
        let frequency_hz  = frequency(c[0]);
        let spread_lsb    = f64::from(c[0] / 64);
        let direction_deg = f64::from(c[1]) * 360.0 / 256.0;
        let code          = BigEndian::read_u16(&c[2..4]) % 4096;
        let power         = ctx.smax * (-0.005 * f64::from(code)).exp();
        let n2_lsb        = f64::from((c[2] / 16) % 4);
        let m2_lsb        = f64::from(c[2] / 64);
        let spread        = (f64::from(c[4]) + spread_lsb / 4.0) * 360.0 / 256.0 / PI;
        let m2            = (f64::from(c[5]) + m2_lsb / 4.0) / 128.0 - 1.0;
        let n2            = (f64::from(c[6]) + n2_lsb / 4.0) / 128.0 - 1.0;
        let depth_factor_k = f64::from(c[7]) * 0.01;

        let spread_rad = spread * PI / 180.0;
        let m1         = 1.0 - spread_rad.powi(2) / 2.0;
        let sigma      = ((1.0 - m2) / 2.0).sqrt();
        let skewness   = ratio_or_nan(-n2, sigma.powi(3));
        let kurtosis   = ratio_or_nan(6.0 - 8.0 * m1 + 2.0 * m2, spread_rad.powi(4));

        Self {
            frequency_hz,
            power,
            direction_deg,
            spread,
            skewness,
            kurtosis,
            m2,
            n2,
            depth_factor_k,
            latitude:  ctx.latitude,
            longitude: ctx.longitude,
        }
    }
}

fn ratio_or_nan(num: f64, den: f64) -> f64 {
    if den == 0.0 { f64::NAN } else { num / den }
}

/// Decode all 64 bins in on-disk order.
pub fn decode_block(block: &[u8; SPECTRAL_SIZE], ctx: &SpectralContext) -> Vec<SpectralBin> {
    block
        .chunks_exact(BIN_SIZE)
        .filter_map(|c| <&[u8; BIN_SIZE]>::try_from(c).ok())
        .map(|c| SpectralBin::decode(c, ctx))
        .collect()
}
